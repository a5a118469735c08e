//! Node codec error types

/// Errors produced by the node codec
///
/// Malformed documents surface as [`NodeError::Json`]: the streaming parser
/// reports bad array lengths, wrong value shapes, truncated objects and
/// unresolved references through serde, with line and column attached.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("malformed node document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{table} index {index} out of range ({count} entries)")]
    UnresolvedIndex {
        table: &'static str,
        index: u32,
        count: usize,
    },

    #[error("node has {found} morph weights but the mesh has {expected} targets")]
    WeightCount { expected: usize, found: usize },

    #[error("document root `nodes` is not an array")]
    InvalidNodes,

    #[error("document root is not a JSON object")]
    NotAnObject,
}
