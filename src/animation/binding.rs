use crate::animation::action::TrackValue;
use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // Maps to transform.position
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
}

/// Maps track `track_index` of a clip to a property of `node_handle`.
///
/// `rest` is captured at bind time and written back when the owning action
/// stops, so a released key returns to its resting pose.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
    pub rest: TrackValue,
}

impl PropertyBinding {
    /// Reads the current value of `target` from `transform`.
    #[must_use]
    pub fn capture(transform: &Transform, target: TargetPath) -> TrackValue {
        match target {
            TargetPath::Translation => TrackValue::Vector3(transform.position),
            TargetPath::Rotation => TrackValue::Quaternion(transform.rotation),
            TargetPath::Scale => TrackValue::Vector3(transform.scale),
        }
    }

    /// Writes `value` into the bound property, ignoring kind mismatches.
    pub fn apply(&self, transform: &mut Transform, value: TrackValue) {
        match (self.target, value) {
            (TargetPath::Translation, TrackValue::Vector3(v)) => transform.position = v,
            (TargetPath::Scale, TrackValue::Vector3(v)) => transform.scale = v,
            (TargetPath::Rotation, TrackValue::Quaternion(q)) => transform.rotation = q,
            _ => return,
        }
        transform.mark_dirty();
    }
}
