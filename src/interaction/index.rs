use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::{ActionHandle, AnimationClip, AnimationMixer};
use crate::interaction::naming::derive_object_name;
use crate::scene::{NodeHandle, Scene};

/// Maps interactable object names to their press action, and lists the
/// nodes that clicks are tested against.
///
/// Built once after the model loads and read-only afterwards. Every key of
/// the map names exactly one candidate node and vice versa.
#[derive(Debug, Default)]
pub struct InteractionIndex {
    actions: FxHashMap<String, ActionHandle>,
    candidates: Vec<NodeHandle>,
}

impl InteractionIndex {
    /// Resolves each clip to the first node under `root` carrying the
    /// derived object name and binds the clip through `mixer`.
    ///
    /// Clips whose object cannot be found are skipped. When two clips
    /// resolve to the same name the later one wins.
    pub fn build(
        scene: &Scene,
        root: NodeHandle,
        clips: &[Arc<AnimationClip>],
        mixer: &mut AnimationMixer,
        suffix: &str,
    ) -> Self {
        let mut index = Self::default();

        for clip in clips {
            let name = derive_object_name(&clip.name, suffix);
            let Some(node) = scene.find_node_by_name(root, name) else {
                log::trace!("Clip '{}' has no object named '{name}'", clip.name);
                continue;
            };

            let action = mixer.clip_action(clip, scene);
            if index.actions.insert(name.to_string(), action).is_some() {
                log::debug!("Clip '{}' replaces the previous action for '{name}'", clip.name);
            }
            if !index.candidates.contains(&node) {
                index.candidates.push(node);
            }
        }

        log::info!("Interaction index: {} playable objects", index.len());
        index
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ActionHandle> {
        self.actions.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Nodes tested by picking, in clip order.
    #[must_use]
    pub fn candidates(&self) -> &[NodeHandle] {
        &self.candidates
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
