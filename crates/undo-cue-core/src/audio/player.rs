//! External-process playback.
//!
//! Each supported utility takes the file path plus an optional volume
//! argument derived from the configured 0.0 ..= 1.0 volume by a fixed
//! per-player scale.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AudioSink;
use crate::error::PlaybackError;

/// Playback utility used by [`ProcessSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// macOS `afplay`; `-v` where 1.0 is unity gain.
    Afplay,
    /// PulseAudio `paplay`; `--volume` where 65536 is unity gain.
    Paplay,
    /// FFmpeg `ffplay`; `-volume` in 0 ..= 100.
    Ffplay,
    /// ALSA `aplay`; no volume control.
    Aplay,
    /// Windows PowerShell `Media.SoundPlayer`; no volume control.
    Powershell,
}

const LINUX_CANDIDATES: [PlayerKind; 3] =
    [PlayerKind::Paplay, PlayerKind::Ffplay, PlayerKind::Aplay];

impl PlayerKind {
    pub const ALL: [PlayerKind; 5] = [
        PlayerKind::Afplay,
        PlayerKind::Paplay,
        PlayerKind::Ffplay,
        PlayerKind::Aplay,
        PlayerKind::Powershell,
    ];

    pub fn program(self) -> &'static str {
        match self {
            PlayerKind::Afplay => "afplay",
            PlayerKind::Paplay => "paplay",
            PlayerKind::Ffplay => "ffplay",
            PlayerKind::Aplay => "aplay",
            PlayerKind::Powershell => "powershell",
        }
    }

    /// Pick the player for this platform.
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(PlayerKind::Afplay)
        } else if cfg!(target_os = "windows") {
            Some(PlayerKind::Powershell)
        } else {
            LINUX_CANDIDATES
                .into_iter()
                .find(|kind| find_on_path(kind.program()).is_some())
        }
    }

    /// Player-specific volume argument for a 0.0 ..= 1.0 volume.
    pub fn volume_parameter(self, volume: f64) -> Option<String> {
        let volume = volume.clamp(0.0, 1.0);
        match self {
            PlayerKind::Afplay => Some(format!("{:.2}", volume * 2.0)),
            PlayerKind::Paplay => Some(format!("{}", (volume * 65536.0).round() as u32)),
            PlayerKind::Ffplay => Some(format!("{}", (volume * 100.0).round() as u32)),
            PlayerKind::Aplay | PlayerKind::Powershell => None,
        }
    }

    /// Full argument list for playing `sound` at `volume`.
    pub fn args(self, sound: &Path, volume: f64) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let level = self.volume_parameter(volume);
        match self {
            PlayerKind::Afplay => {
                if let Some(level) = level {
                    args.push(OsString::from("-v"));
                    args.push(OsString::from(level));
                }
                args.push(sound.as_os_str().to_os_string());
            }
            PlayerKind::Paplay => {
                if let Some(level) = level {
                    args.push(OsString::from(format!("--volume={level}")));
                }
                args.push(sound.as_os_str().to_os_string());
            }
            PlayerKind::Ffplay => {
                for flag in ["-nodisp", "-autoexit", "-loglevel", "quiet"] {
                    args.push(OsString::from(flag));
                }
                if let Some(level) = level {
                    args.push(OsString::from("-volume"));
                    args.push(OsString::from(level));
                }
                args.push(sound.as_os_str().to_os_string());
            }
            PlayerKind::Aplay => {
                args.push(OsString::from("-q"));
                args.push(sound.as_os_str().to_os_string());
            }
            PlayerKind::Powershell => {
                let escaped = sound.display().to_string().replace('\'', "''");
                for flag in ["-NoProfile", "-NonInteractive", "-Command"] {
                    args.push(OsString::from(flag));
                }
                args.push(OsString::from(format!(
                    "(New-Object Media.SoundPlayer '{escaped}').PlaySync()"
                )));
            }
        }
        args
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerKind::ALL
            .into_iter()
            .find(|kind| kind.program().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown player: {s}"))
    }
}

fn find_on_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Sink that spawns one player process per playback.
#[derive(Debug)]
pub struct ProcessSink {
    player: Option<PlayerKind>,
    child: Option<Child>,
}

impl ProcessSink {
    /// Use `player` if given, otherwise detect one.
    pub fn new(player: Option<PlayerKind>) -> Self {
        let player = player.or_else(PlayerKind::detect);
        match player {
            Some(kind) => tracing::debug!(program = kind.program(), "audio player selected"),
            None => tracing::warn!("no audio player found; playback will fail"),
        }
        Self {
            player,
            child: None,
        }
    }

    pub fn player(&self) -> Option<PlayerKind> {
        self.player
    }

    pub fn is_active(&self) -> bool {
        self.child.is_some()
    }

    /// Block until the current playback finishes.
    pub fn wait(&mut self) -> Result<(), PlaybackError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let program = self.program();
        let status = child.wait().map_err(|source| PlaybackError::Spawn {
            program: program.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(PlaybackError::Exited {
                program,
                status: status.to_string(),
            })
        }
    }

    fn program(&self) -> String {
        self.player.map(|p| p.program().to_string()).unwrap_or_default()
    }
}

impl AudioSink for ProcessSink {
    fn start(&mut self, sound: &Path, volume: f64) -> Result<(), PlaybackError> {
        let Some(player) = self.player else {
            let tried = if cfg!(any(target_os = "macos", target_os = "windows")) {
                PlayerKind::detect().map(|p| p.program().to_string()).unwrap_or_default()
            } else {
                LINUX_CANDIDATES
                    .iter()
                    .map(|p| p.program())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            return Err(PlaybackError::NoPlayer { tried });
        };
        if !sound.exists() {
            return Err(PlaybackError::AssetMissing(sound.to_path_buf()));
        }

        self.stop();
        let child = Command::new(player.program())
            .args(player.args(sound, volume))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                program: player.program().to_string(),
                source,
            })?;
        tracing::debug!(program = player.program(), pid = child.id(), "player spawned");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // The process may already have exited; both calls are best effort.
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!(program = %self.program(), "player stopped");
        }
    }

    fn poll_failure(&mut self) -> Option<PlaybackError> {
        let child = self.child.as_mut()?;
        match child.try_wait() {
            Ok(None) => None,
            Ok(Some(status)) => {
                self.child = None;
                if status.success() {
                    None
                } else {
                    Some(PlaybackError::Exited {
                        program: self.program(),
                        status: status.to_string(),
                    })
                }
            }
            Err(source) => {
                self.child = None;
                Some(PlaybackError::Spawn {
                    program: self.program(),
                    source,
                })
            }
        }
    }
}

impl Drop for ProcessSink {
    fn drop(&mut self) {
        self.stop();
    }
}
