//! Core resource definitions, independent of the GPU:
//! - Geometry: CPU-side triangle data with bounds
//! - Mesh / Material: drawable surface attached to a scene node

pub mod geometry;
pub mod mesh;

pub use geometry::{BoundingBox, Geometry};
pub use mesh::{Material, Mesh};
