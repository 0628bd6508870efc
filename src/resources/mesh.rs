use std::sync::Arc;

use glam::Vec4;

use crate::resources::geometry::Geometry;

/// Flat-colored surface description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: Vec4,
}

impl Material {
    #[must_use]
    pub fn new(base_color: Vec4) -> Self {
        Self { base_color }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

/// A drawable surface: shared geometry plus a material.
///
/// Geometry is reference counted so several nodes can reuse one glTF mesh
/// primitive without duplicating vertex data.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Arc<Geometry>,
    pub material: Material,
}

impl Mesh {
    #[must_use]
    pub fn new(name: &str, geometry: Arc<Geometry>, material: Material) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
        }
    }
}
