//! Subcommand implementations

use anyhow::{Context, Result, bail};
use nether_node::{Node, Trs, document};
use serde_json::Value;
use std::path::Path;

use crate::config::{InspectSection, ToolConfig};
use crate::gltf_file::{GltfKind, load_document};

fn format_vec(values: &[f32], precision: usize) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect();
    format!("[{}]", parts.join(", "))
}

fn describe_node(index: usize, node: &Node, settings: &InspectSection) -> String {
    let mut line = format!("node {}", index);
    if let Some(name) = node.name() {
        line.push_str(&format!(" {:?}", name));
    }
    if let Some(mesh) = node.mesh {
        line.push_str(&format!(" mesh={}", mesh));
    }
    if let Some(skin) = node.skin {
        line.push_str(&format!(" skin={}", skin));
    }
    if let Some(camera) = node.camera {
        line.push_str(&format!(" camera={}", camera));
    }
    if !node.children.is_empty() {
        let children: Vec<String> = node.children.iter().map(|c| c.to_string()).collect();
        line.push_str(&format!(" children=[{}]", children.join(", ")));
    }
    if !node.weights.is_empty() {
        line.push_str(&format!(" weights={}", node.weights.len()));
    }

    let (space, trs): (&str, Trs) = if settings.host_space {
        ("host", node.import_to_host_transform())
    } else {
        ("document", node.trs())
    };
    let precision = settings.precision;
    line.push_str(&format!(
        " {}: t={} r={} s={}",
        space,
        format_vec(&trs.translation.to_array(), precision),
        format_vec(&trs.rotation.to_array(), precision),
        format_vec(&trs.scale.to_array(), precision),
    ));
    if !node.uses_trs() {
        line.push_str(" (from matrix)");
    }
    line
}

/// One report line per node of a loaded document root
pub fn inspect_document(root: &Value, settings: &InspectSection) -> Result<Vec<String>> {
    let nodes = document::parse_nodes(root).context("Failed to parse nodes")?;
    Ok(nodes
        .iter()
        .enumerate()
        .map(|(index, node)| describe_node(index, node, settings))
        .collect())
}

/// Log every node of a .gltf or .glb file
pub fn inspect(input: &Path, config: &ToolConfig) -> Result<Vec<String>> {
    let (kind, root) = load_document(input)?;
    tracing::info!("Inspecting {:?} ({:?})", input, kind);

    let lines = inspect_document(&root, &config.inspect)
        .with_context(|| format!("Failed to inspect {:?}", input))?;
    if lines.is_empty() {
        tracing::info!("  no nodes");
    }
    for line in &lines {
        tracing::info!("  {}", line);
    }
    Ok(lines)
}

/// Parse and count the nodes of a file, failing on the first format error
pub fn check(input: &Path) -> Result<usize> {
    let (_, root) = load_document(input)?;
    let nodes = document::parse_nodes(&root)
        .with_context(|| format!("Invalid nodes in {:?}", input))?;
    tracing::info!("{:?}: {} nodes OK", input, nodes.len());
    Ok(nodes.len())
}

/// Rewrite the node array of a .gltf file in canonical form
///
/// Writes back to `input` when no output path is given.
pub fn canonicalize(input: &Path, output: Option<&Path>, config: &ToolConfig) -> Result<()> {
    let (kind, mut root) = load_document(input)?;
    if kind == GltfKind::Binary {
        bail!("Canonicalize only supports .gltf JSON files: {:?}", input);
    }

    let nodes = document::parse_nodes(&root)
        .with_context(|| format!("Invalid nodes in {:?}", input))?;
    document::write_nodes(&mut root, &nodes)?;

    let mut json = if config.output.pretty {
        serde_json::to_string_pretty(&root)?
    } else {
        serde_json::to_string(&root)?
    };
    json.push('\n');

    let output = output.unwrap_or(input);
    std::fs::write(output, json).with_context(|| format!("Failed to write {:?}", output))?;
    tracing::info!("Canonicalized {} nodes -> {:?}", nodes.len(), output);
    Ok(())
}
