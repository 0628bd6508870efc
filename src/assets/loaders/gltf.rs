use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use glam::{Quat, Vec3, Vec4};

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::errors::{PianoError, Result};
use crate::resources::geometry::Geometry;
use crate::resources::mesh::{Material, Mesh};
use crate::scene::{Node, NodeHandle, Scene};

/// Name given to the node every instantiated model hangs under.
pub const GLTF_ROOT_NAME: &str = "gltf_root";

// ============================================================================
// 1. Intermediate data
// ============================================================================

/// One drawable primitive of a glTF mesh.
#[derive(Debug, Clone)]
pub struct GltfPrimitive {
    pub geometry: Arc<Geometry>,
    pub base_color: Vec4,
}

/// A glTF node with its local TRS and the primitives of its mesh.
#[derive(Debug, Clone)]
pub struct GltfNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub children: Vec<usize>,
    pub primitives: Vec<GltfPrimitive>,
}

/// Everything the piano needs from a glTF document, detached from the
/// `gltf` crate's borrowed views so it can cross threads.
#[derive(Debug, Clone, Default)]
pub struct GltfModel {
    pub nodes: Vec<GltfNode>,
    /// Indices of the nodes listed by the default scene.
    pub roots: Vec<usize>,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl GltfModel {
    /// Creates the node tree in `scene` under a fresh root node and
    /// returns that root.
    ///
    /// A node whose mesh has a single primitive carries it directly; with
    /// several primitives each one becomes a child node `<name>_<i>`.
    pub fn instantiate(&self, scene: &mut Scene) -> NodeHandle {
        let root = scene.add_node(Node::new(GLTF_ROOT_NAME));

        let handles: Vec<NodeHandle> = self
            .nodes
            .iter()
            .map(|gnode| {
                let mut node = Node::new(&gnode.name);
                node.transform.position = gnode.translation;
                node.transform.rotation = gnode.rotation;
                node.transform.scale = gnode.scale;
                let handle = scene.nodes.insert(node);

                match gnode.primitives.as_slice() {
                    [] => {}
                    [single] => scene.set_mesh(handle, single.to_mesh(&gnode.name)),
                    many => {
                        for (i, prim) in many.iter().enumerate() {
                            let name = format!("{}_{i}", gnode.name);
                            scene.add_mesh_to_parent(prim.to_mesh(&name), handle);
                        }
                    }
                }
                handle
            })
            .collect();

        for (gnode, &parent) in self.nodes.iter().zip(&handles) {
            for &child in &gnode.children {
                if let Some(&child_handle) = handles.get(child) {
                    scene.attach(child_handle, parent);
                }
            }
        }

        for &index in &self.roots {
            if let Some(&handle) = handles.get(index) {
                scene.attach(handle, root);
            }
        }

        root
    }
}

impl GltfPrimitive {
    fn to_mesh(&self, name: &str) -> Mesh {
        Mesh::new(name, Arc::clone(&self.geometry), Material::new(self.base_color))
    }
}

// ============================================================================
// 2. GltfLoader
// ============================================================================

pub struct GltfLoader;

impl GltfLoader {
    /// Reads and parses a `.glb` / `.gltf` file. External buffers resolve
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<GltfModel> {
        let bytes = std::fs::read(path)
            .map_err(|e| PianoError::AssetNotFound(format!("{}: {e}", path.display())))?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        Self::parse(&bytes, base_dir)
    }

    /// Parses an in-memory GLB or glTF JSON document.
    pub fn parse(bytes: &[u8], base_dir: &Path) -> Result<GltfModel> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;

        let unsupported: Vec<_> = gltf.extensions_required().collect();
        if !unsupported.is_empty() {
            log::warn!("glTF file requires unsupported extensions: {unsupported:?}");
        }

        let buffers = Self::load_buffers(&gltf, base_dir)?;

        let mut nodes = Vec::with_capacity(gltf.nodes().count());
        for node in gltf.nodes() {
            nodes.push(Self::load_node(&node, &buffers)?);
        }

        let roots = gltf
            .default_scene()
            .or_else(|| gltf.scenes().next())
            .map(|scene| scene.nodes().map(|n| n.index()).collect())
            .unwrap_or_default();

        let clips = Self::load_animations(&gltf, &buffers)?;

        log::info!(
            "Parsed glTF: {} nodes, {} animation clips",
            nodes.len(),
            clips.len()
        );

        Ok(GltfModel { nodes, roots, clips })
    }

    fn load_buffers(gltf: &gltf::Gltf, base_dir: &Path) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .clone()
                    .ok_or_else(|| PianoError::MissingBuffer {
                        context: "GLB binary chunk".to_string(),
                        index: buffer.index(),
                    })?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
                gltf::buffer::Source::Uri(uri) => {
                    let buffer_path = base_dir.join(uri);
                    std::fs::read(&buffer_path).map_err(|e| {
                        PianoError::AssetNotFound(format!("{}: {e}", buffer_path.display()))
                    })?
                }
            };

            if data.len() < buffer.length() {
                return Err(PianoError::MissingBuffer {
                    context: format!("buffer holds {} of {} bytes", data.len(), buffer.length()),
                    index: buffer.index(),
                });
            }
            buffer_data.push(data);
        }
        Ok(buffer_data)
    }

    fn load_node(node: &gltf::Node, buffers: &[Vec<u8>]) -> Result<GltfNode> {
        let name = node
            .name()
            .map_or_else(|| format!("Node_{}", node.index()), str::to_string);
        let (t, r, s) = node.transform().decomposed();

        let mut primitives = Vec::new();
        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::debug!("Skipping non-triangle primitive on '{name}'");
                    continue;
                }
                if let Some(prim) = Self::load_primitive(&primitive, buffers)? {
                    primitives.push(prim);
                }
            }
        }

        Ok(GltfNode {
            name,
            translation: Vec3::from_array(t),
            rotation: Quat::from_array(r),
            scale: Vec3::from_array(s),
            children: node.children().map(|c| c.index()).collect(),
            primitives,
        })
    }

    fn load_primitive(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Result<Option<GltfPrimitive>> {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

        let Some(positions) = reader.read_positions() else {
            return Ok(None);
        };
        let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();
        let normals: Option<Vec<Vec3>> = reader
            .read_normals()
            .map(|iter| iter.map(Vec3::from_array).collect());
        let indices: Option<Vec<u32>> = reader.read_indices().map(|r| r.into_u32().collect());

        if let Some(indices) = &indices
            && indices.iter().any(|&i| i as usize >= positions.len())
        {
            return Err(PianoError::GltfError(format!(
                "primitive {} indexes past its {} vertices",
                primitive.index(),
                positions.len()
            )));
        }

        let base_color = Vec4::from_array(
            primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor(),
        );

        Ok(Some(GltfPrimitive {
            geometry: Arc::new(Geometry::new(positions, normals, indices)),
            base_color,
        }))
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<Arc<AnimationClip>>> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let target = channel.target();
                let node_name = target
                    .node()
                    .name()
                    .map_or_else(|| format!("Node_{}", target.node().index()), str::to_string);

                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let Some(inputs) = reader.read_inputs() else {
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };
                let values_per_key = if interpolation == InterpolationMode::CubicSpline { 3 } else { 1 };

                let (target_path, data) = match reader.read_outputs() {
                    Some(gltf::animation::util::ReadOutputs::Translations(iter)) => {
                        let values: Vec<Vec3> = iter.map(Vec3::from_array).collect();
                        (TargetPath::Translation, TrackData::Vector3(KeyframeTrack::new(times, values, interpolation)))
                    }
                    Some(gltf::animation::util::ReadOutputs::Scales(iter)) => {
                        let values: Vec<Vec3> = iter.map(Vec3::from_array).collect();
                        (TargetPath::Scale, TrackData::Vector3(KeyframeTrack::new(times, values, interpolation)))
                    }
                    Some(gltf::animation::util::ReadOutputs::Rotations(iter)) => {
                        let values: Vec<Quat> = iter.into_f32().map(Quat::from_array).collect();
                        (TargetPath::Rotation, TrackData::Quaternion(KeyframeTrack::new(times, values, interpolation)))
                    }
                    _ => continue,
                };

                let (key_count, value_count) = match &data {
                    TrackData::Vector3(t) => (t.times.len(), t.values.len()),
                    TrackData::Quaternion(t) => (t.times.len(), t.values.len()),
                };
                if value_count != key_count * values_per_key {
                    log::warn!(
                        "Animation '{}': channel on '{node_name}' has {value_count} values for {key_count} keys, skipped",
                        anim.name().unwrap_or_default()
                    );
                    continue;
                }

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            let name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            animations.push(Arc::new(AnimationClip::new(name, tracks)));
        }

        Ok(animations)
    }
}

/// Decodes a base64 `data:` URI buffer.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| PianoError::DataUriError("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| PianoError::DataUriError("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(PianoError::DataUriError(format!("unsupported encoding '{header}'")));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}
