//! Shared test fixtures.

use glam::Vec3;

use piano::resources::Geometry;

/// Axis-aligned box centered at the origin.
///
/// Each face gets its own four vertices so normals stay flat.
#[must_use]
pub fn create_box(width: f32, height: f32, depth: f32) -> Geometry {
    let h = Vec3::new(width, height, depth) * 0.5;

    // (normal, u axis, v axis) per face, wound counter-clockwise seen from outside
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (normal + u * su + v * sv) * h;
            positions.push(p);
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Geometry::new(positions, Some(normals), Some(indices))
}
