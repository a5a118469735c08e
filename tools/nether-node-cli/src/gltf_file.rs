//! Loading glTF documents (.gltf JSON or .glb binary container)

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::Path;

/// GLB header magic
const GLB_MAGIC: &[u8; 4] = b"glTF";
/// GLB container version we read
const GLB_VERSION: u32 = 2;
/// Chunk type of the JSON chunk ("JSON")
const CHUNK_JSON: u32 = 0x4E4F534A;

/// Container format of a glTF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GltfKind {
    Json,
    Binary,
}

impl GltfKind {
    /// Detect from the leading bytes, so misnamed files still load
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(GLB_MAGIC) {
            GltfKind::Binary
        } else {
            GltfKind::Json
        }
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    let chunk = bytes
        .get(offset..offset + 4)
        .context("Unexpected end of GLB data")?;
    Ok(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

/// Return the JSON chunk of a GLB container
pub fn glb_json_chunk(bytes: &[u8]) -> Result<&[u8]> {
    if !bytes.starts_with(GLB_MAGIC) {
        bail!("Not a GLB file (bad magic)");
    }

    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        bail!("Unsupported GLB version: {}", version);
    }

    let total_length = read_u32(bytes, 8)? as usize;
    if total_length > bytes.len() {
        bail!(
            "GLB header declares {} bytes, file has {}",
            total_length,
            bytes.len()
        );
    }

    let chunk_length = read_u32(bytes, 12)? as usize;
    let chunk_type = read_u32(bytes, 16)?;
    if chunk_type != CHUNK_JSON {
        bail!("First GLB chunk is 0x{:08X}, expected JSON", chunk_type);
    }

    bytes
        .get(20..20 + chunk_length)
        .context("GLB JSON chunk runs past the end of the file")
}

/// Parse the document root from raw file contents
pub fn parse_document(bytes: &[u8]) -> Result<(GltfKind, Value)> {
    let kind = GltfKind::detect(bytes);
    let json = match kind {
        GltfKind::Json => bytes,
        GltfKind::Binary => glb_json_chunk(bytes)?,
    };

    let root: Value = serde_json::from_slice(json).context("Invalid glTF JSON")?;
    if !root.is_object() {
        bail!("glTF root is not a JSON object");
    }
    Ok((kind, root))
}

/// Read and parse a glTF document from disk
pub fn load_document(path: &Path) -> Result<(GltfKind, Value)> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    parse_document(&bytes).with_context(|| format!("Failed to load glTF: {:?}", path))
}
