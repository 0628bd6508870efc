//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: node creation, attach/re-parent hierarchy
//! - Component management: mesh, camera, light
//! - Node query: names, subtree collection
//! - Transform propagation and camera matrices

mod common;

use std::sync::Arc;

use glam::{Quat, Vec3};
use piano::resources::{Material, Mesh};
use piano::scene::{Camera, Light, LightKind, Node, Scene};

// ============================================================================
// Node Creation
// ============================================================================

#[test]
fn scene_create_node_with_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("TestNode");
    assert_eq!(scene.get_name(handle), Some("TestNode"));
    assert!(!scene.root_nodes.contains(&handle), "Created nodes start detached");
}

#[test]
fn scene_add_node_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("root"));
    assert!(scene.root_nodes.contains(&handle));
}

#[test]
fn scene_add_to_parent() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("parent"));
    let child = scene.add_to_parent(Node::new("child"), parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert!(scene.get_node(parent).unwrap().children().contains(&child));
    assert!(!scene.root_nodes.contains(&child));
}

// ============================================================================
// Hierarchy: Attach
// ============================================================================

#[test]
fn scene_attach_removes_from_root_list() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("parent"));
    let child = scene.add_node(Node::new("child"));

    scene.attach(child, parent);

    assert!(!scene.root_nodes.contains(&child));
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
}

#[test]
fn scene_attach_removes_from_old_parent() {
    let mut scene = Scene::new();
    let parent1 = scene.create_node_with_name("p1");
    let parent2 = scene.create_node_with_name("p2");
    let child = scene.create_node_with_name("child");

    scene.attach(child, parent1);
    assert!(scene.get_node(parent1).unwrap().children().contains(&child));

    scene.attach(child, parent2);
    assert!(
        !scene.get_node(parent1).unwrap().children().contains(&child),
        "Child should be removed from old parent"
    );
    assert!(
        scene.get_node(parent2).unwrap().children().contains(&child),
        "Child should be in new parent"
    );
}

#[test]
fn scene_attach_to_self_is_noop() {
    let mut scene = Scene::new();
    let node = scene.create_node_with_name("n");

    scene.attach(node, node);

    assert_eq!(scene.get_node(node).unwrap().parent(), None);
}

#[test]
fn scene_attach_marks_child_dirty() {
    let mut scene = Scene::new();
    let parent = scene.create_node_with_name("parent");
    let child = scene.create_node_with_name("child");

    // Consume the initial dirty flag
    scene.get_node_mut(child).unwrap().transform.update_local_matrix();

    scene.attach(child, parent);

    assert!(
        scene.get_node_mut(child).unwrap().transform.update_local_matrix(),
        "Attach should mark child transform dirty"
    );
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn scene_find_node_by_name_searches_descendants() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("piano"));
    let keys = scene.add_to_parent(Node::new("Keys"), root);
    let c4 = scene.add_to_parent(Node::new("C4"), keys);
    let other = scene.add_node(Node::new("C4"));

    assert_eq!(scene.find_node_by_name(root, "C4"), Some(c4));
    assert_eq!(scene.find_node_by_name(other, "C4"), Some(other));
    assert_eq!(scene.find_node_by_name(keys, "piano"), None);
}

#[test]
fn scene_find_node_by_name_prefers_pre_order() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let first = scene.add_to_parent(Node::new("A"), root);
    let _nested = scene.add_to_parent(Node::new("dup"), first);
    let _second = scene.add_to_parent(Node::new("dup"), root);

    let found = scene.find_node_by_name(root, "dup").unwrap();
    assert_eq!(scene.get_node(found).unwrap().parent(), Some(first));
}

#[test]
fn scene_collect_subtree_is_pre_order() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let a = scene.add_to_parent(Node::new("a"), root);
    let a1 = scene.add_to_parent(Node::new("a1"), a);
    let b = scene.add_to_parent(Node::new("b"), root);

    assert_eq!(scene.collect_subtree(root), vec![root, a, a1, b]);
}

// ============================================================================
// Components
// ============================================================================

#[test]
fn scene_mesh_components() {
    let mut scene = Scene::new();
    let geometry = Arc::new(common::create_box(1.0, 1.0, 1.0));
    let key = scene.add_node(Node::new("C4"));
    scene.set_mesh(key, Mesh::new("C4", Arc::clone(&geometry), Material::default()));
    let part = scene.add_mesh_to_parent(Mesh::new("C4_1", geometry, Material::default()), key);

    assert!(scene.get_node(key).unwrap().mesh.is_some());
    assert_eq!(scene.get_name(part), Some("C4_1"));
    assert_eq!(scene.iter_visible_meshes().count(), 2);

    scene.get_node_mut(part).unwrap().visible = false;
    assert_eq!(scene.iter_visible_meshes().count(), 1);
}

#[test]
fn scene_active_camera() {
    let mut scene = Scene::new();
    assert!(scene.main_camera().is_none());

    let handle = scene.add_camera(Camera::new_perspective(75.0, 1.0, 0.1, 1000.0));
    scene.active_camera = Some(handle);

    assert!(scene.main_camera().is_some());
    let (_, camera) = scene.query_main_camera_bundle().unwrap();
    camera.set_aspect(2.0);
    assert!((scene.main_camera().unwrap().aspect - 2.0).abs() < 1e-6);
}

#[test]
fn scene_iterate_lights() {
    let mut scene = Scene::new();
    scene.add_light(Light::new_ambient(Vec3::ONE, 1.0));
    let sun = scene.add_light(Light::new_directional(Vec3::ONE, 5.0));
    scene.get_node_mut(sun).unwrap().transform.position = Vec3::new(0.0, 1.0, -2.0);
    scene.update_matrix_world();

    let lights: Vec<_> = scene.iter_active_lights().collect();
    assert_eq!(lights.len(), 2);

    let (light, world) = lights
        .iter()
        .find(|(l, _)| l.kind == LightKind::Directional)
        .unwrap();
    assert!((light.radiance() - Vec3::splat(5.0)).length() < 1e-6);
    assert!(Vec3::from(world.translation).abs_diff_eq(Vec3::new(0.0, 1.0, -2.0), 1e-6));
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn scene_world_matrix_composes_parents() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent");
    parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
    parent.transform.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let parent = scene.add_node(parent);

    let mut child = Node::new("child");
    child.transform.position = Vec3::new(0.0, 0.0, -1.0);
    let child = scene.add_to_parent(child, parent);

    scene.update_matrix_world();

    let world = Vec3::from(scene.get_node(child).unwrap().world_matrix().translation);
    // -Z rotated 90 degrees about Y is -X
    assert!(world.abs_diff_eq(Vec3::new(0.0, 0.0, 0.0), 1e-5), "got {world}");
}

#[test]
fn scene_moving_parent_moves_child() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("parent"));
    let mut child = Node::new("child");
    child.transform.position = Vec3::Y;
    let child = scene.add_to_parent(child, parent);
    scene.update_matrix_world();

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 0.0, 3.0);
    scene.update_matrix_world();

    let world = Vec3::from(scene.get_node(child).unwrap().world_matrix().translation);
    assert!(world.abs_diff_eq(Vec3::new(0.0, 1.0, 3.0), 1e-6), "got {world}");
}

#[test]
fn scene_update_subtree_only_touches_subtree() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    let b = scene.add_node(Node::new("b"));
    scene.update_matrix_world();

    scene.get_node_mut(a).unwrap().transform.position = Vec3::X;
    scene.get_node_mut(b).unwrap().transform.position = Vec3::Y;
    scene.update_subtree(a);

    assert!(Vec3::from(scene.get_node(a).unwrap().world_matrix().translation).abs_diff_eq(Vec3::X, 1e-6));
    assert!(Vec3::from(scene.get_node(b).unwrap().world_matrix().translation).abs_diff_eq(Vec3::ZERO, 1e-6));
}

#[test]
fn camera_follows_its_node() {
    let mut scene = Scene::new();
    let handle = scene.add_camera(Camera::new_perspective(75.0, 1.0, 0.1, 1000.0));
    scene.active_camera = Some(handle);
    scene.get_node_mut(handle).unwrap().transform.position = Vec3::new(0.0, 0.0, 5.0);
    scene.update_matrix_world();

    let camera = scene.main_camera().unwrap();
    assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-6));

    // The origin projects to the center of the screen
    let clip = camera.view_projection_matrix().project_point3(Vec3::ZERO);
    assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
    assert!((0.0..=1.0).contains(&clip.z));

    let back = camera.unproject(clip);
    assert!(back.abs_diff_eq(Vec3::ZERO, 1e-3), "got {back}");
}
