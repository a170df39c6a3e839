//! Utilities for navigating and modifying DataNode trees.

use restconf_core::{DataNode, InnerNode, NodeKey};

/// Get the node reached by following `keys` from `tree`.
pub(crate) fn get_node<'a>(tree: &'a DataNode, keys: &[NodeKey]) -> Option<&'a DataNode> {
    keys.iter()
        .try_fold(tree, |cursor, key| cursor.as_inner()?.child(key))
}

/// Get a mutable reference to the node reached by following `keys`.
pub(crate) fn get_node_mut<'a>(
    tree: &'a mut DataNode,
    keys: &[NodeKey],
) -> Option<&'a mut DataNode> {
    keys.iter()
        .try_fold(tree, |cursor, key| cursor.as_inner_mut()?.child_mut(key))
}

/// Merge `node` into the children of `parent`.
///
/// Inner nodes already present are merged child by child; everything else
/// is inserted, replacing a node with the same key.
pub(crate) fn merge(parent: &mut InnerNode, node: DataNode) {
    let incoming = match node {
        DataNode::Inner(incoming) => incoming,
        leaf => {
            parent.add_child(leaf);
            return;
        }
    };

    match parent.child_mut(incoming.key()) {
        Some(DataNode::Inner(existing)) => {
            for child in incoming.into_children().into_values() {
                merge(existing, child);
            }
        }
        _ => {
            parent.add_child(incoming.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restconf_core::{LeafValue, SchemaId};

    const NS: &str = "urn:example:sys";

    fn system(hostname: &str) -> DataNode {
        DataNode::container(SchemaId::new("system", NS))
            .with_child(DataNode::leaf(SchemaId::new("hostname", NS), hostname))
    }

    #[test]
    fn get_nested() {
        let tree = DataNode::from(InnerNode::root()).with_child(system("edge1"));
        let keys = [
            NodeKey::plain(SchemaId::new("system", NS)),
            NodeKey::plain(SchemaId::new("hostname", NS)),
        ];
        let leaf = get_node(&tree, &keys).unwrap().as_leaf().unwrap();
        assert_eq!(leaf.value(), &LeafValue::from("edge1"));

        assert!(get_node(&tree, &keys[..0]).is_some());
        let missing = [NodeKey::plain(SchemaId::new("other", NS))];
        assert!(get_node(&tree, &missing).is_none());
    }

    #[test]
    fn cannot_traverse_into_leaf() {
        let tree = DataNode::from(InnerNode::root()).with_child(system("edge1"));
        let keys = [
            NodeKey::plain(SchemaId::new("system", NS)),
            NodeKey::plain(SchemaId::new("hostname", NS)),
            NodeKey::plain(SchemaId::new("deeper", NS)),
        ];
        assert!(get_node(&tree, &keys).is_none());
    }

    #[test]
    fn merge_keeps_siblings() {
        let mut root = InnerNode::root();
        root.add_child(
            system("edge1").with_child(DataNode::leaf(SchemaId::new("contact", NS), "ops")),
        );
        merge(&mut root, system("edge2"));

        let system = root.child_by_name("system").unwrap().as_inner().unwrap();
        assert_eq!(system.children().len(), 2);
        assert_eq!(
            system.child_by_name("hostname").unwrap().as_leaf().unwrap().value(),
            &LeafValue::from("edge2")
        );
    }

    #[test]
    fn merge_inserts_missing_nodes() {
        let mut root = InnerNode::root();
        merge(&mut root, system("edge1"));
        assert!(root.child_by_name("system").is_some());
    }
}
