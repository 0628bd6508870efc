use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionHandle;
}

/// Address of a shared clip. The action keeps its own `Arc`, so the address
/// cannot be reused while the cache entry exists.
type ClipId = usize;

/// Drives every action created for one animated subtree.
///
/// Actions are cached per clip instance: asking twice for the same clip
/// yields the same handle, while two distinct clips that happen to share a
/// name get separate actions.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: SlotMap<ActionHandle, AnimationAction>,
    by_clip: FxHashMap<ClipId, ActionHandle>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: SlotMap::with_key(),
            by_clip: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Returns the action for `clip`, creating and binding it on first use.
    pub fn clip_action(&mut self, clip: &Arc<AnimationClip>, scene: &Scene) -> ActionHandle {
        let id = Arc::as_ptr(clip) as ClipId;
        if let Some(&handle) = self.by_clip.get(&id)
            && self.actions.contains_key(handle)
        {
            return handle;
        }

        let mut action = AnimationAction::new(Arc::clone(clip));
        action.bindings = Binder::bind(scene, self.root, clip);
        if action.bindings.len() < clip.tracks.len() {
            log::debug!(
                "Clip '{}': bound {} of {} tracks",
                clip.name,
                action.bindings.len(),
                clip.tracks.len()
            );
        }

        let handle = self.actions.insert(action);
        self.by_clip.insert(id, handle);
        handle
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Advances running actions by `dt` seconds and writes their samples into `scene`.
    ///
    /// Stopped actions first put their bound properties back to rest, so an
    /// action that is still running on the same node wins.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in self.actions.values_mut() {
            if !action.pending_restore {
                continue;
            }
            action.pending_restore = false;
            for binding in &action.bindings {
                if let Some(node) = scene.get_node_mut(binding.node_handle) {
                    binding.apply(&mut node.transform, binding.rest);
                }
            }
        }

        for action in self.actions.values_mut() {
            action.update(dt);

            if !action.is_active() {
                continue;
            }

            for i in 0..action.bindings.len() {
                let track_index = action.bindings[i].track_index;
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };
                let binding = &action.bindings[i];
                if let Some(node) = scene.get_node_mut(binding.node_handle) {
                    binding.apply(&mut node.transform, value);
                }
            }
        }
    }
}
