use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` to a node under `root` by name.
    ///
    /// Tracks whose node cannot be found are left unbound.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        clip.tracks
            .iter()
            .enumerate()
            .filter_map(|(track_index, track)| {
                let node_handle = scene.find_node_by_name(root, &track.meta.node_name)?;
                let node = scene.get_node(node_handle)?;
                Some(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                    rest: PropertyBinding::capture(&node.transform, track.meta.target),
                })
            })
            .collect()
    }
}
