//! Audio sink abstraction.
//!
//! The accumulator only ever issues `start` and `stop`. Decoding and output
//! belong to whatever the sink delegates to: an external player process in
//! production ([`ProcessSink`]), a command log in tests ([`MemorySink`]).

mod asset;
mod player;

pub use asset::{resolve_sound, ASSET_DIR_ENV, DEFAULT_SOUND_FILE};
pub use player::{PlayerKind, ProcessSink};

use std::path::{Path, PathBuf};

use crate::error::PlaybackError;

/// Playback backend driven by the accumulator.
pub trait AudioSink {
    /// Begin asynchronous playback of `sound` at `volume` (0.0 ..= 1.0).
    fn start(&mut self, sound: &Path, volume: f64) -> Result<(), PlaybackError>;

    /// Terminate playback. Must be a no-op when nothing is playing.
    fn stop(&mut self);

    /// Report a failure of a previously started playback, at most once.
    fn poll_failure(&mut self) -> Option<PlaybackError> {
        None
    }
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn start(&mut self, sound: &Path, volume: f64) -> Result<(), PlaybackError> {
        (**self).start(sound, volume)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn poll_failure(&mut self) -> Option<PlaybackError> {
        (**self).poll_failure()
    }
}

/// A command received by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCommand {
    Start { sound: PathBuf, volume: f64 },
    Stop,
}

/// Sink that records commands instead of making sound.
#[derive(Debug, Default)]
pub struct MemorySink {
    commands: Vec<SinkCommand>,
    active: bool,
    fail_next_start: Option<String>,
    pending_failure: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[SinkCommand] {
        &self.commands
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, SinkCommand::Start { .. }))
            .count()
    }

    pub fn stop_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, SinkCommand::Stop))
            .count()
    }

    /// Make the next `start` call fail with `message`.
    pub fn fail_next_start(&mut self, message: impl Into<String>) {
        self.fail_next_start = Some(message.into());
    }

    /// Simulate the active playback dying with `message`.
    pub fn crash(&mut self, message: impl Into<String>) {
        if self.active {
            self.active = false;
            self.pending_failure = Some(message.into());
        }
    }
}

impl AudioSink for MemorySink {
    fn start(&mut self, sound: &Path, volume: f64) -> Result<(), PlaybackError> {
        if let Some(message) = self.fail_next_start.take() {
            return Err(PlaybackError::Rejected(message));
        }
        self.commands.push(SinkCommand::Start {
            sound: sound.to_path_buf(),
            volume,
        });
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.active {
            self.commands.push(SinkCommand::Stop);
            self.active = false;
        }
    }

    fn poll_failure(&mut self) -> Option<PlaybackError> {
        self.pending_failure.take().map(PlaybackError::Rejected)
    }
}
