//! glTF Loader Tests
//!
//! Tests for:
//! - Parsing an embedded (data URI) glTF document
//! - Node names, hierarchy and press clips
//! - Instantiating a model into the scene
//! - Background loading via load_model_async / ModelLoad

use std::path::{Path, PathBuf};

use base64::Engine;
use glam::Vec3;

use piano::animation::clip::TrackData;
use piano::assets::{GLTF_ROOT_NAME, GltfLoader, ModelLoad, load_model_async};
use piano::scene::Scene;

/// Triangle positions, then key times [0, 0.2], then two translations.
fn buffer_bytes() -> Vec<u8> {
    let floats: [f32; 17] = [
        -0.5, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 1.0, 0.0, // positions
        0.0, 0.2, // times
        0.0, 0.0, 0.0, 0.0, -0.1, 0.0, // translations
    ];
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn piano_gltf() -> String {
    let data = base64::engine::general_purpose::STANDARD.encode(buffer_bytes());
    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [
    {{ "name": "Keys", "children": [1, 2] }},
    {{ "name": "C#4", "mesh": 0, "translation": [1.0, 0.0, 0.0] }},
    {{ "mesh": 0 }}
  ],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
  "buffers": [{{ "byteLength": 68, "uri": "data:application/octet-stream;base64,{data}" }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 8 }},
    {{ "buffer": 0, "byteOffset": 44, "byteLength": 24 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [-0.5, 0.0, 0.0], "max": [0.5, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
       "min": [0.0], "max": [0.2] }},
    {{ "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }}
  ],
  "animations": [
    {{
      "name": "C#4_Press",
      "channels": [{{ "sampler": 0, "target": {{ "node": 1, "path": "translation" }} }}],
      "samplers": [{{ "input": 1, "output": 2, "interpolation": "LINEAR" }}]
    }},
    {{
      "channels": [{{ "sampler": 0, "target": {{ "node": 2, "path": "translation" }} }}],
      "samplers": [{{ "input": 1, "output": 2 }}]
    }}
  ]
}}"#
    )
}

fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("piano-loader-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse_nodes_and_hierarchy() {
    let model = GltfLoader::parse(piano_gltf().as_bytes(), Path::new(".")).unwrap();

    assert_eq!(model.nodes.len(), 3);
    assert_eq!(model.roots, vec![0]);
    assert_eq!(model.nodes[0].name, "Keys");
    assert_eq!(model.nodes[0].children, vec![1, 2]);
    assert_eq!(model.nodes[1].name, "C#4");
    assert_eq!(model.nodes[1].translation, Vec3::new(1.0, 0.0, 0.0));
    // Unnamed nodes get a stable fallback name
    assert_eq!(model.nodes[2].name, "Node_2");
}

#[test]
fn parse_reads_triangle_geometry() {
    let model = GltfLoader::parse(piano_gltf().as_bytes(), Path::new(".")).unwrap();

    let key = &model.nodes[1];
    assert_eq!(key.primitives.len(), 1);
    let geometry = &key.primitives[0].geometry;
    assert_eq!(geometry.positions.len(), 3);
    assert_eq!(geometry.indices, vec![0, 1, 2]);
    assert_eq!(geometry.normals.len(), 3);
    assert!(model.nodes[0].primitives.is_empty());
}

#[test]
fn parse_reads_press_clips() {
    let model = GltfLoader::parse(piano_gltf().as_bytes(), Path::new(".")).unwrap();

    assert_eq!(model.clips.len(), 2);
    let clip = &model.clips[0];
    assert_eq!(clip.name, "C#4_Press");
    assert!((clip.duration - 0.2).abs() < 1e-6);
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.node_name, "C#4");
    match &clip.tracks[0].data {
        TrackData::Vector3(track) => {
            assert_eq!(track.values[1], Vec3::new(0.0, -0.1, 0.0));
        }
        TrackData::Quaternion(_) => panic!("expected a translation track"),
    }

    assert_eq!(model.clips[1].name, "Animation_1");
    assert_eq!(model.clips[1].tracks[0].meta.node_name, "Node_2");
}

#[test]
fn parse_rejects_garbage() {
    assert!(GltfLoader::parse(b"not a gltf file", Path::new(".")).is_err());
}

#[test]
fn parse_reports_missing_external_buffer() {
    let json = r#"{
  "asset": { "version": "2.0" },
  "buffers": [{ "byteLength": 4, "uri": "missing-buffer.bin" }]
}"#;
    let dir = std::env::temp_dir().join("piano-loader-tests-no-such-dir");
    assert!(GltfLoader::parse(json.as_bytes(), &dir).is_err());
}

#[test]
fn parse_reports_short_buffer() {
    let data = base64::engine::general_purpose::STANDARD.encode([0u8; 4]);
    let json = format!(
        r#"{{ "asset": {{ "version": "2.0" }},
  "buffers": [{{ "byteLength": 64, "uri": "data:application/octet-stream;base64,{data}" }}] }}"#
    );
    assert!(GltfLoader::parse(json.as_bytes(), Path::new(".")).is_err());
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn instantiate_builds_named_subtree() {
    let model = GltfLoader::parse(piano_gltf().as_bytes(), Path::new(".")).unwrap();
    let mut scene = Scene::new();

    let root = model.instantiate(&mut scene);
    scene.update_matrix_world();

    assert_eq!(scene.get_name(root), Some(GLTF_ROOT_NAME));
    assert!(scene.root_nodes.contains(&root));

    let keys = scene.find_node_by_name(root, "Keys").unwrap();
    assert_eq!(scene.get_node(keys).unwrap().parent(), Some(root));
    assert!(!scene.root_nodes.contains(&keys));

    let key = scene.find_node_by_name(root, "C#4").unwrap();
    assert_eq!(scene.get_node(key).unwrap().parent(), Some(keys));
    assert!(scene.get_node(key).unwrap().mesh.is_some());

    let world = scene.get_node(key).unwrap().world_matrix().translation;
    assert!(Vec3::from(world).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));

    assert_eq!(scene.collect_subtree(root).len(), 4);
}

// ============================================================================
// Background loading
// ============================================================================

#[tokio::test]
async fn load_model_async_reads_file() {
    let path = temp_file("async.gltf", piano_gltf().as_bytes());

    let model = load_model_async(&path).await.unwrap();
    assert_eq!(model.nodes.len(), 3);
    assert_eq!(model.clips[0].name, "C#4_Press");
}

#[tokio::test]
async fn load_model_async_missing_file_errors() {
    let result = load_model_async("definitely/not/here.glb").await;
    assert!(result.is_err());
}

#[test]
fn model_load_delivers_result_once() {
    let path = temp_file("spawned.gltf", piano_gltf().as_bytes());

    let mut load = ModelLoad::spawn(&path).unwrap();
    assert_eq!(load.path(), path.as_path());

    let model = load.wait().expect("first wait yields the result").unwrap();
    assert_eq!(model.nodes.len(), 3);
    assert!(load.is_finished());
    assert!(load.wait().is_none());
    assert!(load.poll().is_none());
}

#[test]
fn model_load_reports_missing_file() {
    let mut load = ModelLoad::spawn("definitely/not/here.glb").unwrap();
    assert!(load.wait().unwrap().is_err());
}
