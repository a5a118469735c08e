//! Node <-> JSON document codec
//!
//! - `read` - streaming parse of a node object
//! - `write` - canonical, default-omitting emit
//! - `tests` - codec test suite
//!
//! Parsing accepts properties in any order and keeps unknown ones. Emitting
//! always uses the order
//! `camera, children, skin, matrix, mesh, rotation, scale, translation, weights`
//! followed by the kept properties.

mod read;
mod write;


use std::io;

use serde::de::DeserializeSeed;
use serde_json::Value;

use crate::error::NodeError;
use crate::index::DocumentContext;
use crate::node::Node;

pub use read::NodeSeed;

/// Node property names understood by the codec
pub mod fields {
    pub const CAMERA: &str = "camera";
    pub const CHILDREN: &str = "children";
    pub const SKIN: &str = "skin";
    pub const MATRIX: &str = "matrix";
    pub const MESH: &str = "mesh";
    pub const ROTATION: &str = "rotation";
    pub const SCALE: &str = "scale";
    pub const TRANSLATION: &str = "translation";
    pub const WEIGHTS: &str = "weights";

    /// All node fields in emit order
    pub const ALL: [&str; 9] = [
        CAMERA,
        CHILDREN,
        SKIN,
        MATRIX,
        MESH,
        ROTATION,
        SCALE,
        TRANSLATION,
        WEIGHTS,
    ];
}

/// Top-level glTF key holding the node array
pub const NODES: &str = "nodes";

/// Parse a single node object without resolving its references
pub fn from_str(json: &str) -> Result<Node, NodeError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a single node object, checking every reference against `context`
pub fn from_str_with_context(json: &str, context: &DocumentContext) -> Result<Node, NodeError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let node = NodeSeed::new(context).deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(node)
}

pub fn from_reader<R: io::Read>(reader: R) -> Result<Node, NodeError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse a node from an already decoded JSON value
pub fn from_value(value: &Value, context: Option<&DocumentContext>) -> Result<Node, NodeError> {
    Ok(NodeSeed::with_context(context).deserialize(value)?)
}

pub fn to_string(node: &Node) -> Result<String, NodeError> {
    Ok(serde_json::to_string(node)?)
}

pub fn to_string_pretty(node: &Node) -> Result<String, NodeError> {
    Ok(serde_json::to_string_pretty(node)?)
}

pub fn to_writer<W: io::Write>(writer: W, node: &Node) -> Result<(), NodeError> {
    Ok(serde_json::to_writer(writer, node)?)
}

pub fn to_value(node: &Node) -> Result<Value, NodeError> {
    Ok(serde_json::to_value(node)?)
}

/// Parse every node of a glTF root object
///
/// References are resolved against the table sizes of the same root. Parsing
/// stops at the first malformed node.
pub fn parse_nodes(root: &Value) -> Result<Vec<Node>, NodeError> {
    let context = DocumentContext::from_root(root);

    match root.get(NODES) {
        None => Ok(Vec::new()),
        Some(Value::Array(nodes)) => {
            tracing::debug!("parsing {} nodes", nodes.len());
            nodes
                .iter()
                .map(|node| from_value(node, Some(&context)))
                .collect()
        }
        Some(_) => Err(NodeError::InvalidNodes),
    }
}

/// Replace the node array of a glTF root object
///
/// An empty slice removes the `nodes` key.
pub fn write_nodes(root: &mut Value, nodes: &[Node]) -> Result<(), NodeError> {
    let object = root.as_object_mut().ok_or(NodeError::NotAnObject)?;

    if nodes.is_empty() {
        object.remove(NODES);
        return Ok(());
    }

    let values = nodes.iter().map(to_value).collect::<Result<Vec<_>, _>>()?;
    object.insert(NODES.to_string(), Value::Array(values));
    tracing::trace!("wrote {} nodes", nodes.len());
    Ok(())
}
