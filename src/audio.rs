//! Note playback through `kira`.

use std::path::{Path, PathBuf};

use kira::backend::DefaultBackend;
use kira::sound::static_sound::StaticSoundData;
use kira::{AudioManager, AudioManagerSettings};
use rustc_hash::FxHashMap;

use crate::assets::asset_runtime;
use crate::errors::{PianoError, Result};
use crate::interaction::NoteSink;

/// A sample decoded in the background; `None` if it could not be read.
type Decoded = (PathBuf, Option<StaticSoundData>);

/// Plays `.wav` note samples, decoding each file once.
///
/// Samples named by [`preload`](Self::preload) are decoded on the asset
/// runtime; anything else is decoded on first use. Without an audio device
/// the player stays silent; clicks still animate.
pub struct KiraNotePlayer {
    manager: Option<AudioManager>,
    sounds: FxHashMap<PathBuf, StaticSoundData>,
    decoded_tx: flume::Sender<Decoded>,
    decoded_rx: flume::Receiver<Decoded>,
}

impl KiraNotePlayer {
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| PianoError::AudioError(e.to_string()))?;

        Ok(Self::with_manager(Some(manager)))
    }

    /// Like [`new`](Self::new), but falls back to a silent player.
    #[must_use]
    pub fn new_or_silent() -> Self {
        Self::new().unwrap_or_else(|e| {
            log::warn!("{e}; notes will not be audible");
            Self::silent()
        })
    }

    #[must_use]
    pub fn silent() -> Self {
        Self::with_manager(None)
    }

    fn with_manager(manager: Option<AudioManager>) -> Self {
        let (decoded_tx, decoded_rx) = flume::unbounded();
        Self {
            manager,
            sounds: FxHashMap::default(),
            decoded_tx,
            decoded_rx,
        }
    }

    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.manager.is_none()
    }

    /// Number of samples decoded and ready to play.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.sounds.len()
    }

    /// Decodes `paths` on the asset runtime so the first click on a key
    /// does not wait for its file. A silent player skips the work.
    pub fn preload(&self, paths: Vec<PathBuf>) {
        if self.is_silent() || paths.is_empty() {
            return;
        }
        let runtime = match asset_runtime() {
            Ok(runtime) => runtime,
            Err(e) => {
                log::debug!("Sample preload skipped: {e}");
                return;
            }
        };

        log::debug!("Preloading {} note samples", paths.len());
        let tx = self.decoded_tx.clone();
        runtime.spawn_blocking(move || {
            for path in paths {
                let sound = decode(&path);
                if tx.send((path, sound)).is_err() {
                    break;
                }
            }
        });
    }

    /// Moves finished background decodes into the cache.
    fn collect_decoded(&mut self) {
        for (path, sound) in self.decoded_rx.try_iter() {
            if let Some(sound) = sound {
                self.sounds.insert(path, sound);
            }
        }
    }

    fn load_sound(&mut self, path: &Path) -> Option<StaticSoundData> {
        self.collect_decoded();
        if let Some(sound) = self.sounds.get(path) {
            return Some(sound.clone());
        }
        let sound = decode(path)?;
        self.sounds.insert(path.to_path_buf(), sound.clone());
        Some(sound)
    }
}

fn decode(path: &Path) -> Option<StaticSoundData> {
    StaticSoundData::from_file(path)
        .map_err(|e| log::debug!("Failed to load sound {}: {e}", path.display()))
        .ok()
}

impl NoteSink for KiraNotePlayer {
    fn play_note(&mut self, path: &Path) {
        if self.manager.is_none() {
            return;
        }
        let Some(sound) = self.load_sound(path) else {
            return;
        };
        if let Some(manager) = self.manager.as_mut()
            && let Err(e) = manager.play(sound)
        {
            log::debug!("Failed to play {}: {e}", path.display());
        }
    }
}
