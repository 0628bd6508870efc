//! Geometry and BoundingBox Tests
//!
//! Tests for:
//! - BoundingBox center, size, union, transform
//! - Geometry defaults (indices, normals)
//! - Area-weighted vertex normal computation
//! - Box fixture used by the picking tests

mod common;

use glam::{Affine3A, Quat, Vec3};

use piano::resources::{BoundingBox, Geometry};

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

// ============================================================================
// BoundingBox
// ============================================================================

#[test]
fn bbox_center_and_size() {
    let bb = BoundingBox {
        min: Vec3::new(-1.0, -2.0, -3.0),
        max: Vec3::new(1.0, 2.0, 3.0),
    };
    assert!(vec3_approx(bb.center(), Vec3::ZERO));
    assert!(vec3_approx(bb.size(), Vec3::new(2.0, 4.0, 6.0)));
}

#[test]
fn bbox_from_no_points_is_empty() {
    assert!(BoundingBox::from_points(&[]).is_empty());
    assert!(!BoundingBox::from_points(&[Vec3::ONE]).is_empty());
}

#[test]
fn bbox_union() {
    let a = BoundingBox::from_points(&[Vec3::ZERO, Vec3::ONE]);
    let b = BoundingBox::from_points(&[Vec3::splat(-1.0), Vec3::splat(0.5)]);
    let u = a.union(&b);
    assert!(vec3_approx(u.min, Vec3::splat(-1.0)));
    assert!(vec3_approx(u.max, Vec3::ONE));

    let with_empty = a.union(&BoundingBox::EMPTY);
    assert_eq!(with_empty, a);
}

#[test]
fn bbox_transform_rotated() {
    let bb = BoundingBox::from_points(&[Vec3::new(-2.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0)]);
    let m = Affine3A::from_rotation_translation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), Vec3::X);
    let t = bb.transform(&m);

    // Long side now along Y
    assert!(vec3_approx(t.size(), Vec3::new(2.0, 4.0, 2.0)));
    assert!(vec3_approx(t.center(), Vec3::X));
}

#[test]
fn bbox_transform_keeps_empty() {
    let t = BoundingBox::EMPTY.transform(&Affine3A::from_translation(Vec3::ONE));
    assert!(t.is_empty());
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn geometry_defaults_to_sequential_indices() {
    let geometry = Geometry::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ZERO, Vec3::Y, Vec3::NEG_X],
        None,
        None,
    );
    assert_eq!(geometry.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(geometry.triangles().count(), 2);
    assert_eq!(geometry.vertex_count(), 6);
}

#[test]
fn geometry_computes_face_normals() {
    // Counter-clockwise in the XY plane faces +Z
    let geometry = Geometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, None);
    for n in &geometry.normals {
        assert!(vec3_approx(*n, Vec3::Z), "got {n}");
    }
}

#[test]
fn geometry_replaces_mismatched_normals() {
    let geometry = Geometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], Some(vec![Vec3::X]), None);
    assert_eq!(geometry.normals.len(), 3);
    assert!(vec3_approx(geometry.normals[0], Vec3::Z));
}

#[test]
fn geometry_skips_out_of_range_triangles() {
    let geometry = Geometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, Some(vec![0, 1, 2, 0, 1, 9]));
    assert_eq!(geometry.triangles().count(), 1);
}

#[test]
fn geometry_bounding_box() {
    let geometry = Geometry::new(vec![Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, -4.0, 0.0), Vec3::Y], None, None);
    let bb = geometry.bounding_box();
    assert!(vec3_approx(bb.min, Vec3::new(-1.0, -4.0, 0.0)));
    assert!(vec3_approx(bb.max, Vec3::new(3.0, 1.0, 2.0)));
}

// ============================================================================
// Box fixture
// ============================================================================

#[test]
fn box_has_flat_faces() {
    let geometry = common::create_box(2.0, 4.0, 6.0);
    assert_eq!(geometry.vertex_count(), 24);
    assert_eq!(geometry.indices.len(), 36);
    assert!(vec3_approx(geometry.bounding_box().size(), Vec3::new(2.0, 4.0, 6.0)));
    assert!(vec3_approx(geometry.bounding_box().center(), Vec3::ZERO));
}

#[test]
fn box_winding_matches_normals() {
    let geometry = common::create_box(1.0, 1.0, 1.0);
    for (tri, chunk) in geometry.triangles().zip(geometry.indices.chunks_exact(3)) {
        let [a, b, c] = tri;
        let face = (b - a).cross(c - a).normalize();
        let normal = geometry.normals[chunk[0] as usize];
        assert!(vec3_approx(face, normal), "face {face} vs normal {normal}");
    }
}
