mod config;
mod store;

pub use config::Config;
pub use store::SettingsStore;

use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::error::{ConfigError, ValidationError};

pub const DEFAULT_VOLUME: f64 = 0.5;
pub const DEFAULT_ASSISTANCE_DELAY_SECS: f64 = 0.8;
pub const VOLUME_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const DELAY_RANGE_SECS: RangeInclusive<f64> = 0.0..=5.0;

/// Read side of the user settings the accumulator depends on.
pub trait SettingsProvider {
    /// Playback volume, 0.0 ..= 1.0.
    fn volume(&self) -> f64;
    /// Sustained-undo duration required before playback, in seconds.
    fn assistance_delay_secs(&self) -> f64;
}

pub fn clamp_volume(volume: f64) -> f64 {
    clamp_to(volume, VOLUME_RANGE, DEFAULT_VOLUME)
}

pub fn clamp_delay(secs: f64) -> f64 {
    clamp_to(secs, DELAY_RANGE_SECS, DEFAULT_ASSISTANCE_DELAY_SECS)
}

fn clamp_to(value: f64, range: RangeInclusive<f64>, fallback: f64) -> f64 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}

/// Parse user-entered text as a finite number.
pub fn parse_number(field: &str, input: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::NotANumber {
        field: field.to_string(),
        input: input.to_string(),
    };
    let value: f64 = input.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Returns the settings directory.
///
/// `UNDO_CUE_CONFIG_DIR` wins outright. Otherwise `~/.config/undo-cue`,
/// or `~/.config/undo-cue-dev` when `UNDO_CUE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("UNDO_CUE_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("UNDO_CUE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("undo-cue-dev")
            } else {
                base_dir.join("undo-cue")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_documented_ranges() {
        assert_eq!(clamp_volume(-1.0), 0.0);
        assert_eq!(clamp_volume(2.0), 1.0);
        assert_eq!(clamp_volume(0.3), 0.3);
        assert_eq!(clamp_delay(-1.0), 0.0);
        assert_eq!(clamp_delay(10.0), 5.0);
        assert_eq!(clamp_delay(f64::NAN), DEFAULT_ASSISTANCE_DELAY_SECS);
    }

    #[test]
    fn parse_number_accepts_padded_decimals() {
        assert_eq!(parse_number("volume", " 0.25 "), Ok(0.25));
        assert_eq!(parse_number("volume", "-3"), Ok(-3.0));
    }

    #[test]
    fn parse_number_rejects_garbage() {
        assert!(parse_number("delay", "abc").is_err());
        assert!(parse_number("delay", "").is_err());
        assert!(parse_number("delay", "inf").is_err());
        assert!(parse_number("delay", "NaN").is_err());
    }
}
