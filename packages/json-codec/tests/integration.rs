use restconf_core::{CodecError, DataNodeType, DocumentCodec, LeafValue, ResourceId, UriPath};
use restconf_json_codec::{JsonCodec, LeafType, Module, SchemaContext, SchemaNode};
use serde_json::json;

const SCHEMA: &str = r#"{
    "modules": [{
        "name": "net",
        "namespace": "urn:example:net",
        "nodes": [
            {"name": "devices", "kind": "container", "children": [
                {"name": "device", "kind": "list", "keys": ["id"], "children": [
                    {"name": "id", "kind": "leaf", "type": "uint"},
                    {"name": "port", "kind": "list", "keys": ["id"], "children": [
                        {"name": "id", "kind": "leaf", "type": "uint"},
                        {"name": "enabled", "kind": "leaf", "type": "boolean"},
                        {"name": "shutdown", "kind": "leaf", "type": "empty"}
                    ]}
                ]}
            ]}
        ]
    }, {
        "name": "ext",
        "namespace": "urn:example:ext",
        "nodes": [
            {"name": "counters", "kind": "container", "children": [
                {"name": "drops", "kind": "leaf", "type": "int"}
            ]}
        ]
    }]
}"#;

fn codec() -> JsonCodec {
    JsonCodec::new(SchemaContext::from_json(SCHEMA).unwrap())
}

#[test]
fn test_nested_list_path() {
    let path = UriPath::parse("/net:devices/device=1/port=2/enabled").unwrap();
    let id = codec().path_to_resource_id(&path).unwrap();
    assert_eq!(id.to_string(), "/devices/device[id=1]/port[id=2]/enabled");
    assert_eq!(id.relative_keys().len(), 4);
}

#[test]
fn test_decode_leaf_under_list_entry() {
    let path = UriPath::parse("/devices/device=1/port=2").unwrap();
    let data = codec()
        .document_to_resource_data(&path, &json!({"enabled": true, "shutdown": [null]}))
        .unwrap();

    assert_eq!(
        data.resource_id().unwrap().to_string(),
        "/devices/device[id=1]/port[id=2]"
    );
    let leaves: Vec<_> = data
        .data_nodes()
        .iter()
        .map(|node| node.as_leaf().unwrap().value().clone())
        .collect();
    assert!(leaves.contains(&LeafValue::Bool(true)));
    assert!(leaves.contains(&LeafValue::Empty));
}

#[test]
fn test_single_object_accepted_for_list() {
    let path = UriPath::parse("/devices/device=1").unwrap();
    let data = codec()
        .document_to_resource_data(&path, &json!({"port": {"id": 2}}))
        .unwrap();
    assert_eq!(data.data_nodes().len(), 1);
    assert_eq!(
        data.data_nodes()[0].node_type(),
        DataNodeType::MultiInstanceNode
    );
}

#[test]
fn test_invalid_leaf_value() {
    let path = UriPath::parse("/devices/device=1/port=2").unwrap();
    let err = codec()
        .document_to_resource_data(&path, &json!({"enabled": "maybe"}))
        .unwrap_err();
    assert!(err.to_string().contains("enabled"));
}

#[test]
fn test_document_beneath_leaf_rejected() {
    let path = UriPath::parse("/devices/device=1/port=2/enabled").unwrap();
    assert!(codec()
        .document_to_resource_data(&path, &json!({}))
        .is_err());
}

#[test]
fn test_root_document_round_trip() {
    let codec = codec();
    let doc = json!({
        "net:devices": {"device": [{"id": 1}]},
        "ext:counters": {"drops": -4}
    });
    let data = codec
        .document_to_resource_data(&UriPath::root(), &doc)
        .unwrap();
    assert!(data.resource_id().is_none());

    let encoded = codec
        .resource_data_to_document(&ResourceId::root(), &data.data_nodes()[0])
        .unwrap();
    assert_eq!(encoded, doc);
}

fn shared_name_codec() -> JsonCodec {
    let system = |leaf: &str| {
        SchemaNode::container("system").with_child(SchemaNode::leaf(leaf, LeafType::String))
    };
    JsonCodec::new(
        SchemaContext::new()
            .with_module(Module::new("a", "urn:example:a").with_node(system("x")))
            .with_module(Module::new("b", "urn:example:b").with_node(system("y"))),
    )
}

#[test]
fn test_shared_top_level_name_needs_module() {
    let codec = shared_name_codec();

    let err = codec
        .path_to_resource_id(&UriPath::parse("/system").unwrap())
        .unwrap_err();
    assert!(matches!(err, CodecError::MalformedPath { .. }));
    assert!(err.to_string().contains("several modules"));

    let id = codec
        .path_to_resource_id(&UriPath::parse("/b:system").unwrap())
        .unwrap();
    let key = id.last_key().unwrap();
    assert_eq!(key.schema_id().namespace(), Some("urn:example:b"));
}

#[test]
fn test_shared_top_level_member_needs_module() {
    let codec = shared_name_codec();
    assert!(codec
        .document_to_resource_data(&UriPath::root(), &json!({"system": {"y": "1"}}))
        .is_err());

    let data = codec
        .document_to_resource_data(&UriPath::root(), &json!({"b:system": {"y": "1"}}))
        .unwrap();
    let encoded = codec
        .resource_data_to_document(&ResourceId::root(), &data.data_nodes()[0])
        .unwrap();
    assert_eq!(encoded, json!({"b:system": {"y": "1"}}));
}

#[test]
fn test_non_finite_decimal_rejected() {
    let codec = JsonCodec::new(SchemaContext::new().with_module(
        Module::new("m", "urn:example:m").with_node(
            SchemaNode::container("c").with_child(SchemaNode::leaf("ratio", LeafType::Decimal)),
        ),
    ));

    for raw in ["NaN", "inf", "-inf"] {
        let err = codec
            .document_to_resource_data(&UriPath::root(), &json!({"m:c": {"ratio": raw}}))
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue { .. }), "{}", raw);
    }
    assert!(codec
        .document_to_resource_data(&UriPath::root(), &json!({"m:c": {"ratio": "0.5"}}))
        .is_ok());
}
