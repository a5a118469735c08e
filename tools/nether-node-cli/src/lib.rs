//! nether-node-cli library
//!
//! Document loading and the command implementations behind the `nether-node`
//! binary, exposed so they can be driven from tests and other tools.

pub mod commands;
pub mod config;
pub mod gltf_file;

pub use commands::{canonicalize, check, inspect, inspect_document};
pub use config::{ToolConfig, load_config};
pub use gltf_file::{GltfKind, load_document};
