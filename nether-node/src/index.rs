//! Typed index references and document-wide resolution
//!
//! References between glTF objects are plain array indices. An [`Index<T>`]
//! only remembers which table it points into; checking it against the table
//! sizes is done separately through a [`DocumentContext`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NodeError;
use crate::node::Node;

/// Marker for references into the document's `cameras` array
#[derive(Debug)]
pub enum Camera {}

/// Marker for references into the document's `meshes` array
#[derive(Debug)]
pub enum Mesh {}

/// Marker for references into the document's `skins` array
#[derive(Debug)]
pub enum Skin {}

/// A table a node can reference
pub trait IndexKind {
    /// Name of the top-level glTF array holding the targets
    const TABLE: &'static str;

    fn table_len(context: &DocumentContext) -> usize;
}

impl IndexKind for Camera {
    const TABLE: &'static str = "cameras";

    fn table_len(context: &DocumentContext) -> usize {
        context.cameras
    }
}

impl IndexKind for Mesh {
    const TABLE: &'static str = "meshes";

    fn table_len(context: &DocumentContext) -> usize {
        context.meshes
    }
}

impl IndexKind for Skin {
    const TABLE: &'static str = "skins";

    fn table_len(context: &DocumentContext) -> usize {
        context.skins
    }
}

impl IndexKind for Node {
    const TABLE: &'static str = "nodes";

    fn table_len(context: &DocumentContext) -> usize {
        context.nodes
    }
}

/// Index into a document array of `T`
pub struct Index<T> {
    value: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Index<T> {
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            marker: PhantomData,
        }
    }

    pub const fn value(self) -> u32 {
        self.value
    }

    pub const fn as_usize(self) -> usize {
        self.value as usize
    }
}

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Index<T> {}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Ord for Index<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> PartialOrd for Index<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({})", self.value)
    }
}

impl<T> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<u32> for Index<T> {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Index<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Index<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Self::new)
    }
}

/// Sizes of the document tables node references resolve against
///
/// Shared by every node of a document; read-only while nodes are parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentContext {
    pub cameras: usize,
    pub meshes: usize,
    pub skins: usize,
    pub nodes: usize,
}

impl DocumentContext {
    pub fn new(cameras: usize, meshes: usize, skins: usize, nodes: usize) -> Self {
        Self {
            cameras,
            meshes,
            skins,
            nodes,
        }
    }

    /// Count the top-level arrays of a glTF root object
    ///
    /// Missing or non-array entries count as empty tables.
    pub fn from_root(root: &serde_json::Value) -> Self {
        let len = |key: &str| root.get(key).and_then(|v| v.as_array()).map_or(0, Vec::len);

        Self {
            cameras: len(Camera::TABLE),
            meshes: len(Mesh::TABLE),
            skins: len(Skin::TABLE),
            nodes: len(Node::TABLE),
        }
    }

    pub fn len_of<T: IndexKind>(&self) -> usize {
        T::table_len(self)
    }

    /// Check a raw index against the table of `T`
    pub fn resolve<T: IndexKind>(&self, index: u32) -> Result<Index<T>, NodeError> {
        let count = T::table_len(self);
        let resolved = Index::new(index);
        if resolved.as_usize() < count {
            Ok(resolved)
        } else {
            Err(NodeError::UnresolvedIndex {
                table: T::TABLE,
                index,
                count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_serializes_as_integer() {
        let index: Index<Mesh> = Index::new(5);
        assert_eq!(serde_json::to_string(&index).unwrap(), "5");

        let parsed: Index<Mesh> = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.value(), 7);
    }

    #[test]
    fn test_index_rejects_negative() {
        assert!(serde_json::from_str::<Index<Camera>>("-1").is_err());
    }

    #[test]
    fn test_context_from_root() {
        let root = json!({
            "asset": { "version": "2.0" },
            "cameras": [{}, {}],
            "meshes": [{}],
            "nodes": [{}, {}, {}],
        });
        let context = DocumentContext::from_root(&root);

        assert_eq!(context, DocumentContext::new(2, 1, 0, 3));
        assert_eq!(context.len_of::<Node>(), 3);
    }

    #[test]
    fn test_resolve_in_and_out_of_range() {
        let context = DocumentContext::new(0, 2, 1, 0);

        assert_eq!(context.resolve::<Mesh>(1).unwrap(), Index::new(1));
        assert!(context.resolve::<Skin>(0).is_ok());

        let err = context.resolve::<Mesh>(2).unwrap_err();
        assert!(matches!(
            err,
            NodeError::UnresolvedIndex {
                table: "meshes",
                index: 2,
                count: 2
            }
        ));
        assert!(context.resolve::<Camera>(0).is_err());
    }

    #[test]
    fn test_index_ordering() {
        let mut indices: Vec<Index<Node>> = vec![3.into(), 1.into(), 2.into()];
        indices.sort();
        assert_eq!(indices, vec![Index::new(1), Index::new(2), Index::new(3)]);
    }
}
