//! Picking Tests
//!
//! Tests for:
//! - Pointer to NDC conversion
//! - Ray / triangle intersection through Raycaster
//! - pick(): nearest hit, descendant leaves, misses

mod common;

use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};

use piano::interaction::{Ray, Raycaster, pick, pointer_to_ndc};
use piano::resources::{Geometry, Material, Mesh};
use piano::scene::{Camera, Node, NodeHandle, Scene};

const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
const CENTER: Vec2 = Vec2::new(400.0, 300.0);

fn unit_box(name: &str) -> Mesh {
    Mesh::new(name, Arc::new(common::create_box(1.0, 1.0, 1.0)), Material::default())
}

fn scene_with_camera() -> Scene {
    let mut scene = Scene::new();
    let camera = scene.add_camera(Camera::new_perspective(75.0, VIEWPORT.x / VIEWPORT.y, 0.1, 1000.0));
    scene.get_node_mut(camera).unwrap().transform.position = Vec3::new(0.0, 0.0, 5.0);
    scene.active_camera = Some(camera);
    scene
}

fn add_box(scene: &mut Scene, name: &str, position: Vec3) -> NodeHandle {
    let mut node = Node::new(name);
    node.transform.position = position;
    let handle = scene.add_node(node);
    scene.set_mesh(handle, unit_box(name));
    handle
}

fn pick_at(scene: &Scene, pointer: Vec2, candidates: &[NodeHandle]) -> Option<NodeHandle> {
    pick(pointer, VIEWPORT, scene.main_camera().unwrap(), scene, candidates)
}

// ============================================================================
// pointer_to_ndc
// ============================================================================

#[test]
fn ndc_corners_and_center() {
    assert_eq!(pointer_to_ndc(Vec2::ZERO, VIEWPORT), Some(Vec2::new(-1.0, 1.0)));
    assert_eq!(pointer_to_ndc(VIEWPORT, VIEWPORT), Some(Vec2::new(1.0, -1.0)));
    assert_eq!(pointer_to_ndc(CENTER, VIEWPORT), Some(Vec2::ZERO));
}

#[test]
fn ndc_rejects_degenerate_viewport() {
    assert!(pointer_to_ndc(CENTER, Vec2::new(0.0, 600.0)).is_none());
    assert!(pointer_to_ndc(CENTER, Vec2::new(800.0, 0.0)).is_none());
}

// ============================================================================
// Raycaster
// ============================================================================

#[test]
fn ray_rejects_zero_direction() {
    assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0)).unwrap();
    assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    assert!(ray.at(3.0).abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-6));
}

#[test]
fn raycaster_reports_world_distance() {
    let mut scene = Scene::new();
    let node = add_box(&mut scene, "box", Vec3::ZERO);
    scene.get_node_mut(node).unwrap().transform.scale = Vec3::splat(2.0);
    scene.update_matrix_world();

    let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
    let hits = Raycaster::new(ray).intersect_objects(&scene, &[node], false);

    assert_eq!(hits.len(), 1);
    // Scaled box front face sits at z = 1
    assert!((hits[0].distance - 4.0).abs() < 1e-4, "distance {}", hits[0].distance);
    assert!(hits[0].point.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-4));
}

#[test]
fn raycaster_sorts_nearest_first() {
    let mut scene = Scene::new();
    let far = add_box(&mut scene, "far", Vec3::new(0.0, 0.0, -3.0));
    let near = add_box(&mut scene, "near", Vec3::ZERO);
    scene.update_matrix_world();

    let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
    let hits = Raycaster::new(ray).intersect_objects(&scene, &[far, near], false);

    assert_eq!(hits.iter().map(|h| h.node).collect::<Vec<_>>(), vec![near, far]);
}

#[test]
fn raycaster_respects_far_limit() {
    let mut scene = Scene::new();
    let node = add_box(&mut scene, "box", Vec3::ZERO);
    scene.update_matrix_world();

    let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
    let mut raycaster = Raycaster::new(ray);
    raycaster.far = 2.0;
    assert!(raycaster.intersect_objects(&scene, &[node], false).is_empty());
}

#[test]
fn raycaster_hits_back_facing_triangle() {
    let mut scene = Scene::new();
    // Single triangle facing +Z, hit from behind
    let geometry = Geometry::new(
        vec![Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        None,
        None,
    );
    let handle = scene.add_node(Node::new("tri"));
    scene.set_mesh(handle, Mesh::new("tri", Arc::new(geometry), Material::default()));
    scene.update_matrix_world();

    let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z).unwrap();
    let hits = Raycaster::new(ray).intersect_objects(&scene, &[handle], false);
    assert_eq!(hits.len(), 1);
}

#[test]
fn raycaster_follows_rotation() {
    let mut scene = Scene::new();
    let node = add_box(&mut scene, "bar", Vec3::ZERO);
    {
        let t = &mut scene.get_node_mut(node).unwrap().transform;
        t.scale = Vec3::new(4.0, 0.2, 0.2);
        t.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    }
    scene.update_matrix_world();

    // Rotated bar now extends along Y
    let raycaster = Raycaster::new(Ray::new(Vec3::new(0.0, 1.5, 5.0), Vec3::NEG_Z).unwrap());
    assert_eq!(raycaster.intersect_objects(&scene, &[node], false).len(), 1);

    let raycaster = Raycaster::new(Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z).unwrap());
    assert!(raycaster.intersect_objects(&scene, &[node], false).is_empty());
}

// ============================================================================
// pick
// ============================================================================

#[test]
fn pick_center_hits_box() {
    let mut scene = scene_with_camera();
    let key = add_box(&mut scene, "C4", Vec3::ZERO);
    scene.update_matrix_world();

    assert_eq!(pick_at(&scene, CENTER, &[key]), Some(key));
}

#[test]
fn pick_miss_returns_none() {
    let mut scene = scene_with_camera();
    let key = add_box(&mut scene, "C4", Vec3::ZERO);
    scene.update_matrix_world();

    assert_eq!(pick_at(&scene, Vec2::new(10.0, 10.0), &[key]), None);
}

#[test]
fn pick_ignores_non_candidates() {
    let mut scene = scene_with_camera();
    let _lid = add_box(&mut scene, "Lid", Vec3::new(0.0, 0.0, 1.0));
    let key = add_box(&mut scene, "C4", Vec3::ZERO);
    scene.update_matrix_world();

    // The lid is in front but not a candidate
    assert_eq!(pick_at(&scene, CENTER, &[key]), Some(key));
}

#[test]
fn pick_returns_nearest_of_overlapping() {
    let mut scene = scene_with_camera();
    let back = add_box(&mut scene, "C4", Vec3::new(0.0, 0.0, -2.0));
    let front = add_box(&mut scene, "D4", Vec3::new(0.0, 0.0, 1.0));
    scene.update_matrix_world();

    assert_eq!(pick_at(&scene, CENTER, &[back, front]), Some(front));
}

#[test]
fn pick_returns_descendant_leaf() {
    let mut scene = scene_with_camera();
    let key = scene.add_node(Node::new("C4"));
    let part = scene.add_mesh_to_parent(unit_box("C4_0"), key);
    scene.update_matrix_world();

    assert_eq!(pick_at(&scene, CENTER, &[key]), Some(part));
}

#[test]
fn pick_sees_camera_orbit() {
    let mut scene = scene_with_camera();
    let key = add_box(&mut scene, "C4", Vec3::new(3.0, 0.0, 0.0));
    let camera = scene.active_camera.unwrap();
    scene
        .get_node_mut(camera)
        .unwrap()
        .transform
        .look_at(Vec3::new(3.0, 0.0, 0.0), Vec3::Y);
    scene.update_matrix_world();

    assert_eq!(pick_at(&scene, CENTER, &[key]), Some(key));
}
