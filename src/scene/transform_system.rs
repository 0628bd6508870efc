//! Transform System
//!
//! Propagates local matrices down the hierarchy into world matrices.
//! Decoupled from [`Scene`](crate::scene::Scene) so it only borrows the
//! node arena and camera pool, avoiding borrow conflicts with the rest of
//! the scene.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::camera::Camera;
use crate::scene::node::Node;
use crate::scene::{CameraKey, NodeHandle};

/// Pending work item: node, parent world matrix, whether the parent changed.
type StackEntry = (NodeHandle, Affine3A, bool);

/// Updates the world matrices of every node reachable from `roots`.
///
/// Uses an explicit stack so deep hierarchies cannot overflow the call
/// stack. A node's world matrix is only recomputed when its own local
/// matrix or an ancestor's world matrix changed this pass.
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    roots: &[NodeHandle],
) {
    let stack = roots
        .iter()
        .rev()
        .map(|&root| (root, Affine3A::IDENTITY, false))
        .collect();

    propagate(nodes, cameras, stack);
}

/// Updates a single subtree against its parent's current world matrix.
pub fn update_subtree(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    root: NodeHandle,
) {
    let Some(node) = nodes.get_mut(root) else {
        return;
    };
    let parent = node.parent;

    let parent_world = parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    propagate(nodes, cameras, vec![(root, parent_world, true)]);
}

fn propagate(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    mut stack: Vec<StackEntry>,
) {
    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let changed = node.transform.update_local_matrix() || parent_changed;

        if changed {
            let world = parent_world * node.transform.local_matrix;
            node.transform.set_world_matrix(world);

            if let Some(camera_key) = node.camera
                && let Some(camera) = cameras.get_mut(camera_key)
            {
                camera.update_view_projection(&world);
            }
        }

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, changed));
        }
    }
}
