use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::animation::{ActionHandle, AnimationMixer};
use crate::interaction::index::InteractionIndex;
use crate::interaction::naming::audio_asset_path;
use crate::settings::DEFAULT_STOP_DELAY;

/// Multiplier turning a clip duration in seconds into the authored playback
/// window. The window is reported but never used to stop an action.
const AUTHORED_WINDOW_SCALE: f32 = 1.4;

/// Receives audio requests for triggered keys.
///
/// Implementations must not fail the caller: a missing or undecodable file
/// is the implementation's problem to swallow.
pub trait NoteSink {
    fn play_note(&mut self, path: &Path);
}

/// A sink that drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotes;

impl NoteSink for SilentNotes {
    fn play_note(&mut self, _path: &Path) {}
}

/// What a successful trigger set in motion.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub object: String,
    pub action: ActionHandle,
    /// Clock time at which the action will be stopped.
    pub stop_at: Duration,
    /// `clip duration x 1.4` seconds.
    pub authored_window: Duration,
    pub sound: PathBuf,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledStop {
    action: ActionHandle,
    due: Duration,
}

/// Starts key animations and their notes, and stops each animation a fixed
/// delay later.
///
/// Scheduled stops are never cancelled. A key clicked twice within the
/// delay is stopped by the first click's timer, and again by the second's.
#[derive(Debug)]
pub struct PlaybackController {
    stop_delay: Duration,
    sounds_dir: PathBuf,
    pending: Vec<ScheduledStop>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_DELAY, "sounds")
    }
}

impl PlaybackController {
    #[must_use]
    pub fn new(stop_delay: Duration, sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            stop_delay,
            sounds_dir: sounds_dir.into(),
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn stop_delay(&self) -> Duration {
        self.stop_delay
    }

    /// Number of stops not yet fired.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drops every scheduled stop without firing it.
    ///
    /// Handles are only meaningful for the mixer they came from, so this
    /// must run whenever that mixer is replaced.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Sample file for the object named `name`.
    #[must_use]
    pub fn sound_path(&self, name: &str) -> PathBuf {
        audio_asset_path(&self.sounds_dir, name)
    }

    /// Earliest pending stop deadline.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|s| s.due).min()
    }

    /// Plays the press animation of `name` from its start, requests its
    /// note and schedules a stop at `now + stop_delay`.
    ///
    /// Does nothing and returns `None` when `name` has no entry in `index`.
    pub fn trigger(
        &mut self,
        name: &str,
        now: Duration,
        index: &InteractionIndex,
        mixer: &mut AnimationMixer,
        notes: &mut dyn NoteSink,
    ) -> Option<PlaybackSession> {
        let Some(handle) = index.get(name) else {
            log::trace!("No press animation for '{name}'");
            return None;
        };
        let Some(action) = mixer.action_mut(handle) else {
            log::warn!("Action for '{name}' is no longer owned by the mixer");
            return None;
        };

        action.reset().play();
        let authored_window =
            Duration::try_from_secs_f32(action.clip().duration * AUTHORED_WINDOW_SCALE).unwrap_or_default();

        let sound = self.sound_path(name);
        notes.play_note(&sound);

        let stop_at = now + self.stop_delay;
        self.pending.push(ScheduledStop { action: handle, due: stop_at });

        log::debug!("Key '{name}' pressed, stop at {stop_at:?}");
        Some(PlaybackSession {
            object: name.to_string(),
            action: handle,
            stop_at,
            authored_window,
            sound,
        })
    }

    /// Stops every action whose deadline is at or before `now`.
    ///
    /// Returns how many stops fired.
    pub fn fire_due(&mut self, now: Duration, mixer: &mut AnimationMixer) -> usize {
        let mut fired = 0;
        self.pending.retain(|stop| {
            if stop.due > now {
                return true;
            }
            if let Some(action) = mixer.action_mut(stop.action) {
                action.stop();
            }
            fired += 1;
            false
        });
        fired
    }
}
