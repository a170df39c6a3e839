//! JSON document codec for RESTCONF.
//!
//! A reference [`DocumentCodec`](restconf_core::DocumentCodec) that resolves
//! request paths and converts RFC 7951 style JSON documents using a small
//! schema model:
//! - `SchemaContext`: modules with their containers, lists, leaves and RPCs
//! - `JsonCodec`: the codec itself

mod codec;
mod convert;
mod schema;

pub use codec::JsonCodec;
pub use schema::{LeafType, Module, SchemaContext, SchemaNode, SchemaNodeKind};
