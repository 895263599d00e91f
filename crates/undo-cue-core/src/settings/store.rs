//! Persisting settings provider.
//!
//! Wraps a [`Config`] and the file it came from. Writes go straight to disk;
//! external edits are picked up by [`SettingsStore::reload`].

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{clamp_delay, clamp_volume, parse_number, Config, SettingsProvider};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    config: Config,
    modified: Option<SystemTime>,
}

impl SettingsStore {
    /// Open the store at the default location.
    pub fn open() -> Result<Self> {
        Self::open_at(Config::path()?)
    }

    /// Open the store backed by `path`, creating it with defaults if absent.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = Config::load_from(&path)?;
        let modified = modified_at(&path);
        Ok(Self {
            path,
            config,
            modified,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse, clamp and persist a volume. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Non-numeric input is rejected without touching the stored value.
    pub fn set_volume(&mut self, input: &str) -> Result<f64> {
        let volume = clamp_volume(parse_number("volume", input)?);
        self.update(|cfg| cfg.volume = volume)?;
        tracing::info!(volume, "volume updated");
        Ok(volume)
    }

    /// Parse, clamp and persist an assistance delay in seconds.
    ///
    /// # Errors
    ///
    /// Non-numeric input is rejected without touching the stored value.
    pub fn set_delay(&mut self, input: &str) -> Result<f64> {
        let delay = clamp_delay(parse_number("assistance delay", input)?);
        self.update(|cfg| cfg.assistance_delay = delay)?;
        tracing::info!(assistance_delay_secs = delay, "assistance delay updated");
        Ok(delay)
    }

    /// Generic key update through [`Config::set`], persisted on success.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.config.clone();
        next.set(key, value)?;
        self.update(|cfg| *cfg = next)
    }

    /// Re-read the file. Returns `true` when the loaded settings differ.
    pub fn reload(&mut self) -> Result<bool> {
        let fresh = Config::load_from(&self.path)?;
        self.modified = modified_at(&self.path);
        if fresh == self.config {
            return Ok(false);
        }
        self.config = fresh;
        Ok(true)
    }

    /// Reload only when the file's modification time moved.
    pub fn reload_if_modified(&mut self) -> Result<bool> {
        let current = modified_at(&self.path);
        if current.is_some() && current == self.modified {
            return Ok(false);
        }
        self.reload()
    }

    fn update(&mut self, apply: impl FnOnce(&mut Config)) -> Result<()> {
        let mut next = self.config.clone();
        apply(&mut next);
        next.save_to(&self.path)?;
        self.config = next;
        self.modified = modified_at(&self.path);
        Ok(())
    }
}

impl SettingsProvider for SettingsStore {
    fn volume(&self) -> f64 {
        self.config.volume
    }

    fn assistance_delay_secs(&self) -> f64 {
        self.config.assistance_delay
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
