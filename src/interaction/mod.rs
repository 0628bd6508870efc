//! Click-to-play interaction.
//!
//! - [`InteractionIndex`]: which objects can be clicked and which action each plays
//! - [`picking`]: pointer position to nearest clicked object
//! - [`PlaybackController`]: starts a key's animation and note, stops it later

pub mod index;
pub mod naming;
pub mod picking;
pub mod playback;

pub use index::InteractionIndex;
pub use naming::{audio_asset_path, derive_object_name};
pub use picking::{Intersection, Ray, Raycaster, pick, pointer_to_ndc};
pub use playback::{NoteSink, PlaybackController, PlaybackSession, SilentNotes};
