//! An interactive 3D piano.
//!
//! Click a key of the loaded glTF model and its `<key>_Press` animation
//! plays together with `sounds/<key>.wav`; the animation is stopped 350 ms
//! later. The pieces, leaf to root:
//!
//! - [`assets`]: background glTF/GLB loading into a plain-data [`GltfModel`]
//! - [`scene`], [`animation`]: scene graph and keyframe playback
//! - [`interaction`]: the interaction index, picking and playback controller
//! - [`piano`]: the state a click touches, independent of any window
//! - [`app`], [`renderer`]: winit event loop and wgpu drawing

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod audio;
pub mod errors;
pub mod interaction;
pub mod piano;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod utils;

pub use animation::{ActionHandle, AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use app::App;
pub use assets::{GltfLoader, GltfModel, ModelLoad};
pub use audio::KiraNotePlayer;
pub use errors::{PianoError, Result};
pub use interaction::{InteractionIndex, NoteSink, PlaybackController, PlaybackSession};
pub use piano::Piano;
pub use renderer::Renderer;
pub use resources::{Geometry, Material, Mesh};
pub use scene::{Camera, Light, Node, NodeHandle, Scene};
pub use settings::PianoSettings;
pub use utils::OrbitControls;
