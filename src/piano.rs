//! The piano's interaction state.
//!
//! [`Piano`] owns everything a click touches after the model has loaded:
//! the animation mixer, the interaction index and the playback controller.
//! It knows nothing about windows or GPUs, so it can be driven directly.

use std::path::PathBuf;
use std::time::Duration;

use glam::Vec2;

use crate::animation::AnimationMixer;
use crate::assets::GltfModel;
use crate::interaction::{InteractionIndex, NoteSink, PlaybackController, PlaybackSession, pick};
use crate::scene::{NodeHandle, Scene};
use crate::settings::PianoSettings;

struct Loaded {
    root: NodeHandle,
    mixer: AnimationMixer,
    index: InteractionIndex,
}

pub struct Piano {
    press_suffix: String,
    time_step: f32,
    playback: PlaybackController,
    loaded: Option<Loaded>,
}

impl Piano {
    #[must_use]
    pub fn new(settings: &PianoSettings) -> Self {
        Self {
            press_suffix: settings.press_suffix.clone(),
            time_step: settings.time_step,
            playback: PlaybackController::new(settings.stop_delay, settings.sounds_dir.clone()),
            loaded: None,
        }
    }

    /// Adds the model to `scene` and builds the interaction index from its
    /// clips. Returns the model's root node.
    pub fn on_model_loaded(&mut self, model: &GltfModel, scene: &mut Scene) -> NodeHandle {
        if let Some(previous) = &self.loaded {
            log::warn!("Model loaded twice; replacing index (old root kept in scene: {:?})", previous.root);
            self.playback.clear_pending();
        }

        let root = model.instantiate(scene);
        scene.update_matrix_world();

        let mut mixer = AnimationMixer::new(root);
        let index = InteractionIndex::build(scene, root, &model.clips, &mut mixer, &self.press_suffix);

        self.loaded = Some(Loaded { root, mixer, index });
        root
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeHandle> {
        self.loaded.as_ref().map(|l| l.root)
    }

    #[must_use]
    pub fn index(&self) -> Option<&InteractionIndex> {
        self.loaded.as_ref().map(|l| &l.index)
    }

    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.loaded.as_ref().map(|l| &l.mixer)
    }

    /// Sample files of every playable object, sorted.
    #[must_use]
    pub fn note_paths(&self) -> Vec<PathBuf> {
        let Some(loaded) = &self.loaded else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = loaded.index.names().map(|name| self.playback.sound_path(name)).collect();
        paths.sort();
        paths
    }

    #[must_use]
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Triggers the object named `name`, if it is playable.
    pub fn press(&mut self, name: &str, now: Duration, notes: &mut dyn NoteSink) -> Option<PlaybackSession> {
        let loaded = self.loaded.as_mut()?;
        self.playback.trigger(name, now, &loaded.index, &mut loaded.mixer, notes)
    }

    /// Picks the object under `pointer` and triggers it.
    ///
    /// Before the model has loaded, or when the pointer misses every key,
    /// nothing happens.
    pub fn click(
        &mut self,
        pointer: Vec2,
        viewport: Vec2,
        scene: &Scene,
        now: Duration,
        notes: &mut dyn NoteSink,
    ) -> Option<PlaybackSession> {
        let loaded = self.loaded.as_ref()?;
        let camera = scene.main_camera()?;
        let hit = pick(pointer, viewport, camera, scene, loaded.index.candidates())?;
        let name = scene.get_name(hit)?.to_string();
        log::debug!("Clicked '{name}'");
        self.press(&name, now, notes)
    }

    /// Per-frame update: fires due stops, then advances the mixer by the
    /// fixed time step.
    pub fn tick(&mut self, now: Duration, scene: &mut Scene) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let fired = self.playback.fire_due(now, &mut loaded.mixer);
        if fired > 0 {
            log::trace!("{fired} key animation(s) stopped");
        }
        loaded.mixer.update(self.time_step, scene);
    }
}
