//! Core error types for undo-cue-core.
//!
//! The hierarchy mirrors the failure classes the subsystem can hit:
//! bad user input, settings persistence, audio playback and the editor's
//! own undo primitive. None of them is fatal to the host.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for undo-cue-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Audio playback errors
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Errors raised by the host editor's undo primitive
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors for user-supplied settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Input text is not a number
    #[error("'{input}' is not a valid number for {field}")]
    NotANumber { field: String, input: String },
}

/// Audio playback errors.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No supported playback utility on this machine
    #[error("No audio player available (tried: {tried})")]
    NoPlayer { tried: String },

    /// The sound asset does not exist
    #[error("Sound file not found: {0}")]
    AssetMissing(PathBuf),

    /// The player process could not be spawned
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The player process exited unsuccessfully
    #[error("{program} exited with {status}")]
    Exited { program: String, status: String },

    /// Failure reported by an in-memory sink
    #[error("{0}")]
    Rejected(String),
}

/// Error surfaced by a host document's undo primitive.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("undo failed: {0}")]
pub struct EditorError(pub String);

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
