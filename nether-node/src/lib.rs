//! Nether-Node: glTF scene-graph nodes for Nethercore asset tools
//!
//! This crate models a single glTF 2.0 node and everything needed to move it
//! between a document and a host engine:
//!
//! - **Node model**: camera/mesh/skin references, ordered children, morph
//!   weights, and a transform stored as either a matrix or TRS, never both
//! - **Transform codec**: matrix <-> TRS decomposition and the handedness
//!   flip between document and host conventions
//! - **Document codec**: streaming serde parse and canonical emit that omits
//!   default values and keeps unknown properties
//!
//! # Usage
//!
//! ```
//! use nether_node::{document, Node};
//!
//! let node = document::from_str(r#"{"mesh":0,"translation":[0,0,1],"name":"Box"}"#).unwrap();
//! assert!(node.uses_trs());
//! assert_eq!(node.name(), Some("Box"));
//!
//! let host = node.import_to_host_transform();
//! assert_eq!(host.translation.z, -1.0);
//!
//! let json = document::to_string(&node).unwrap();
//! assert_eq!(json, r#"{"mesh":0,"translation":[0.0,0.0,1.0],"name":"Box"}"#);
//! ```
//!
//! # Format Reference
//!
//! - glTF 2.0 specification, section 5.25 (node)
//! - <https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html#reference-node>

pub mod document;
mod error;
pub mod index;
mod node;
pub mod transform;

pub use document::NodeSeed;
pub use error::NodeError;
pub use index::{Camera, DocumentContext, Index, IndexKind, Mesh, Skin};
pub use node::{EXTENSIONS, EXTRAS, NAME, Node};
pub use transform::{LocalTransform, Transform, Trs};
