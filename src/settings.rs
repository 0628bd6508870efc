//! Piano Settings
//!
//! Compiled-in defaults for everything the piano needs at start-up. There
//! is no configuration file; callers adjust a [`PianoSettings`] value (or
//! use the [`App`](crate::app::App) builder methods) before running.
//!
//! ```rust,ignore
//! use piano::PianoSettings;
//!
//! let settings = PianoSettings {
//!     model_path: "assets/piano.glb".into(),
//!     ..Default::default()
//! };
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::renderer::settings::RendererSettings;

/// Marker separating the object name from the rest of a key-press clip name.
pub const DEFAULT_PRESS_SUFFIX: &str = "_Press";

/// Wall-clock time after which a triggered key animation is stopped.
pub const DEFAULT_STOP_DELAY: Duration = Duration::from_millis(350);

/// Simulation time step applied to the animation mixer once per frame.
pub const DEFAULT_TIME_STEP: f32 = 0.01;

/// Top-level configuration for the piano application.
#[derive(Debug, Clone)]
pub struct PianoSettings {
    /// Path of the binary glTF model.
    pub model_path: PathBuf,
    /// Directory holding the `<note>.wav` samples.
    pub sounds_dir: PathBuf,
    /// Clip-name suffix marking a key-press animation.
    pub press_suffix: String,
    /// Fixed delay before a triggered animation is stopped.
    pub stop_delay: Duration,
    /// Seconds of animation time advanced per rendered frame.
    pub time_step: f32,

    pub window_title: String,
    pub window_size: (f64, f64),

    pub camera: CameraSettings,
    pub orbit: OrbitSettings,
    pub renderer: RendererSettings,
}

impl Default for PianoSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("piano.glb"),
            sounds_dir: PathBuf::from("sounds"),
            press_suffix: DEFAULT_PRESS_SUFFIX.to_string(),
            stop_delay: DEFAULT_STOP_DELAY,
            time_step: DEFAULT_TIME_STEP,
            window_title: "Myth Piano".to_string(),
            window_size: (1280.0, 720.0),
            camera: CameraSettings::default(),
            orbit: OrbitSettings::default(),
            renderer: RendererSettings::default(),
        }
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance from the orbit target along +Z.
    pub distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
        }
    }
}

/// Orbit controller behaviour.
#[derive(Debug, Clone, Copy)]
pub struct OrbitSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.25,
            enable_zoom: true,
        }
    }
}
