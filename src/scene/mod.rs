//! Scene Graph Module
//!
//! Holds the displayed model and its surroundings:
//! - [`Node`]: named scene node with parent/child links and a transform
//! - [`Transform`]: position, rotation, scale with cached matrices
//! - [`Scene`]: node arena plus mesh, camera and light component pools
//! - [`Camera`]: perspective camera with cached view/projection matrices
//! - [`Light`]: ambient and directional lights
//! - [`transform_system`]: world-matrix propagation, decoupled from `Scene`

pub mod camera;
pub mod light;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct CameraKey;
    pub struct LightKey;
}
