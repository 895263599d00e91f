//! # Undo Cue Core Library
//!
//! Plays an audio cue when a user keeps hitting undo. A single isolated undo
//! does nothing; a sustained burst of effective undos longer than the
//! configured assistance delay starts the cue, and a short pause stops it.
//!
//! ## Architecture
//!
//! - **Accumulator**: a clock-driven state machine that requires the caller
//!   to periodically invoke `tick()` so its stop-timer can fire
//! - **Settings**: TOML-backed volume and assistance delay, clamped on every write
//! - **Audio**: a sink trait with a process-backed implementation that shells
//!   out to the platform's playback utility
//! - **Editor**: the seam to the host editor's documents and native undo
//!
//! ## Key Components
//!
//! - [`UndoAccumulator`]: core state machine
//! - [`Session`]: activation lifecycle and command surface
//! - [`SettingsStore`]: persisted user settings
//! - [`AudioSink`]: playback backend trait

pub mod accumulator;
pub mod audio;
pub mod clock;
pub mod editor;
pub mod error;
pub mod events;
pub mod session;
pub mod settings;

pub use accumulator::{AccumulatorState, StopReason, UndoAccumulator, UndoOutcome, STOP_TIMER_MS};
pub use audio::{AudioSink, MemorySink, PlayerKind, ProcessSink};
pub use clock::{Clock, ManualClock, SystemClock};
pub use editor::{Document, EditorHost, ScratchEditor, TextBuffer};
pub use error::{ConfigError, CoreError, EditorError, PlaybackError, ValidationError};
pub use events::Event;
pub use session::Session;
pub use settings::{Config, SettingsProvider, SettingsStore};
