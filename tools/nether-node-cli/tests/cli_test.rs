//! Integration tests for nether-node-cli
//!
//! Writes glTF files to a temp dir and drives the commands against them.

use nether_node_cli::{
    GltfKind, ToolConfig, canonicalize, check, inspect, load_config, load_document,
};
use serde_json::{Value, json};
use std::path::Path;
use tempfile::tempdir;

fn write_json(path: &Path, value: &Value) {
    let text = serde_json::to_string(value).expect("Failed to serialize test document");
    std::fs::write(path, text).expect("Failed to write test document");
}

fn write_glb(path: &Path, value: &Value) {
    let mut json = serde_json::to_vec(value).expect("Failed to serialize test document");
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let total = 12 + 8 + json.len();

    let mut glb = Vec::new();
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes());
    glb.extend_from_slice(&json);
    std::fs::write(path, glb).expect("Failed to write GLB");
}

fn scene() -> Value {
    json!({
        "asset": { "version": "2.0" },
        "meshes": [{}],
        "nodes": [
            {
                "name": "Root",
                "children": [1],
                "matrix": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]
            },
            {
                "extras": { "tag": 7 },
                "scale": [1, 1, 1],
                "translation": [0, 2, 0],
                "mesh": 0
            }
        ]
    })
}

#[test]
fn test_canonicalize_gltf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("scene.gltf");
    let output = dir.path().join("scene.canonical.gltf");
    write_json(&input, &scene());

    canonicalize(&input, Some(&output), &ToolConfig::default()).expect("canonicalize failed");
    assert!(output.exists(), "Output file should exist");

    let text = std::fs::read_to_string(&output).expect("Failed to read output");
    let root: Value = serde_json::from_str(&text).expect("Output is not JSON");

    assert_eq!(root["asset"]["version"], "2.0");
    assert_eq!(root["nodes"][0], json!({ "children": [1], "name": "Root" }));
    assert_eq!(
        root["nodes"][1],
        json!({ "mesh": 0, "translation": [0.0, 2.0, 0.0], "extras": { "tag": 7 } })
    );

    // Canonical output is a fixed point
    let again = dir.path().join("scene.again.gltf");
    canonicalize(&output, Some(&again), &ToolConfig::default()).expect("second pass failed");
    assert_eq!(
        std::fs::read_to_string(&again).expect("Failed to read second output"),
        text
    );
}

#[test]
fn test_canonicalize_in_place_compact() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("scene.gltf");
    write_json(&input, &scene());

    let mut config = ToolConfig::default();
    config.output.pretty = false;
    canonicalize(&input, None, &config).expect("canonicalize failed");

    let text = std::fs::read_to_string(&input).expect("Failed to read rewritten file");
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with(r#"{"asset":"#));
}

#[test]
fn test_canonicalize_rejects_glb() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("scene.glb");
    write_glb(&input, &scene());

    assert!(canonicalize(&input, None, &ToolConfig::default()).is_err());
}

#[test]
fn test_check_counts_nodes() {
    let dir = tempdir().expect("Failed to create temp dir");
    let gltf = dir.path().join("scene.gltf");
    let glb = dir.path().join("scene.glb");
    write_json(&gltf, &scene());
    write_glb(&glb, &scene());

    assert_eq!(check(&gltf).expect("check failed"), 2);
    assert_eq!(check(&glb).expect("check failed on GLB"), 2);

    let (kind, _) = load_document(&glb).expect("Failed to load GLB");
    assert_eq!(kind, GltfKind::Binary);
}

#[test]
fn test_check_reports_bad_reference() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("broken.gltf");
    write_json(&input, &json!({ "nodes": [{ "children": [4] }] }));

    let err = check(&input).expect_err("dangling child should fail");
    assert!(format!("{:#}", err).contains("nodes index 4 out of range"));
}

#[test]
fn test_inspect_reports_every_node() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("scene.gltf");
    write_json(&input, &scene());

    let lines = inspect(&input, &ToolConfig::default()).expect("inspect failed");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"Root\""));
    assert!(lines[1].contains("mesh=0"));
    assert!(lines[1].contains("t=[0.0000, 2.0000, "));
}

#[test]
fn test_load_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nether-node.toml");
    std::fs::write(&path, "[inspect]\nhost_space = false\nprecision = 2\n")
        .expect("Failed to write config");

    let config = load_config(Some(&path)).expect("Failed to load config");
    assert!(!config.inspect.host_space);
    assert_eq!(config.inspect.precision, 2);
    assert!(config.output.pretty);

    std::fs::write(&path, "[output]\ncolour = true\n").expect("Failed to write config");
    assert!(load_config(Some(&path)).is_err());

    assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
}
