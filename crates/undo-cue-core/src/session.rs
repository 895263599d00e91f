//! Activation lifecycle and command surface.
//!
//! A [`Session`] is what a host creates when it loads the feature and drops
//! (via [`Session::deactivate`]) when it unloads it. It owns the settings,
//! the accumulator and, through it, the audio sink.

use std::path::Path;

use crate::accumulator::{UndoAccumulator, UndoOutcome};
use crate::audio::{resolve_sound, AudioSink};
use crate::clock::{Clock, SystemClock};
use crate::editor::EditorHost;
use crate::error::Result;
use crate::events::Event;
use crate::settings::SettingsStore;

pub struct Session<S, C = SystemClock> {
    store: SettingsStore,
    accumulator: UndoAccumulator<S, C>,
}

impl<S: AudioSink, C: Clock> Session<S, C> {
    /// Build a fresh accumulator from the stored settings.
    ///
    /// The cue file is resolved here, once.
    pub fn activate(store: SettingsStore, sink: S, clock: C) -> Self {
        Self::activate_with_asset(store, sink, clock, None)
    }

    /// Like [`Self::activate`], with a host-provided location of the
    /// bundled cue tried before the executable-relative default.
    pub fn activate_with_asset(
        store: SettingsStore,
        sink: S,
        clock: C,
        bundled: Option<&Path>,
    ) -> Self {
        let sound = resolve_sound(store.config().sound_path.as_deref(), bundled);
        if !sound.exists() {
            tracing::warn!(path = %sound.display(), "undo cue file not found");
        }
        let accumulator = UndoAccumulator::new(&store, sink, clock, sound);
        tracing::info!(
            volume = accumulator.volume(),
            delay_ms = accumulator.delay_ms(),
            settings = %store.path().display(),
            "session activated"
        );
        Self { store, accumulator }
    }

    pub fn accumulator(&self) -> &UndoAccumulator<S, C> {
        &self.accumulator
    }

    pub fn accumulator_mut(&mut self) -> &mut UndoAccumulator<S, C> {
        &mut self.accumulator
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.store
    }

    /// Replacement for the editor's undo command.
    ///
    /// Returns `Ok(None)` when there is no active document. Errors from the
    /// native undo are passed through untouched and leave the accumulator
    /// as it was.
    ///
    /// Hosts must call [`Self::tick`] before each undo so an expired
    /// stop-timer resets the burst first.
    pub fn undo_pressed(&mut self, host: &mut dyn EditorHost) -> Result<Option<Event>> {
        let Some(document) = host.active_document() else {
            tracing::trace!("undo pressed without an active document");
            return Ok(None);
        };
        let before = document.version();
        document.undo()?;
        let outcome = UndoOutcome::from_versions(before, document.version());
        Ok(Some(self.accumulator.observe(outcome)))
    }

    /// Command: set the volume from user-entered text.
    pub fn set_volume(&mut self, input: &str) -> Result<Event> {
        self.store.set_volume(input)?;
        Ok(self.accumulator.apply_settings(&self.store))
    }

    /// Command: set the assistance delay (seconds) from user-entered text.
    pub fn set_delay(&mut self, input: &str) -> Result<Event> {
        self.store.set_delay(input)?;
        Ok(self.accumulator.apply_settings(&self.store))
    }

    /// Settings-change notification. Re-reads the settings file and
    /// refreshes the accumulator when something changed.
    ///
    /// An unreadable file keeps the current values.
    pub fn settings_changed(&mut self) -> Option<Event> {
        self.refresh(|store| store.reload())
    }

    /// Cheap variant of [`Self::settings_changed`] for polling loops: only
    /// re-reads when the file's modification time moved.
    pub fn poll_settings(&mut self) -> Option<Event> {
        self.refresh(|store| store.reload_if_modified())
    }

    /// Let the stop-timer fire and collect playback failures.
    pub fn tick(&mut self) -> Option<Event> {
        self.accumulator.tick()
    }

    pub fn snapshot(&self) -> Event {
        self.accumulator.snapshot()
    }

    /// Stop playback if active and tear the session down.
    pub fn deactivate(mut self) -> Event {
        let event = self.accumulator.shutdown();
        tracing::info!("session deactivated");
        event
    }

    fn refresh(
        &mut self,
        reload: impl FnOnce(&mut SettingsStore) -> Result<bool>,
    ) -> Option<Event> {
        match reload(&mut self.store) {
            Ok(true) => Some(self.accumulator.apply_settings(&self.store)),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(error = %e, "settings reload failed; keeping current values");
                None
            }
        }
    }
}
