pub mod gltf;

pub use gltf::{GLTF_ROOT_NAME, GltfLoader, GltfModel, GltfNode, GltfPrimitive};
