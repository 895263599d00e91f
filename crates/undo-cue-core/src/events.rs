use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accumulator::{AccumulatorState, StopReason};

/// Every state change in the accumulator produces an Event.
/// Hosts print, log or forward them; nothing inside the core consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A qualifying undo advanced the threshold without starting playback.
    UndoAccumulated {
        threshold_ms: u64,
        delay_ms: u64,
        at: DateTime<Utc>,
    },
    /// The threshold crossed the assistance delay and the sink was started.
    PlaybackStarted {
        threshold_ms: u64,
        volume: f64,
        at: DateTime<Utc>,
    },
    /// Playback was active and has been stopped.
    PlaybackStopped {
        reason: StopReason,
        at: DateTime<Utc>,
    },
    /// The sink could not start, or a started playback died.
    PlaybackFailed {
        message: String,
        at: DateTime<Utc>,
    },
    /// Accumulated state was cleared while nothing was playing.
    AccumulatorReset {
        reason: StopReason,
        discarded_ms: u64,
        at: DateTime<Utc>,
    },
    /// Volume or assistance delay changed.
    SettingsChanged {
        volume: f64,
        assistance_delay_secs: f64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: AccumulatorState,
        threshold_ms: u64,
        delay_ms: u64,
        volume: f64,
        is_playing: bool,
        stop_due_in_ms: Option<u64>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name of the variant, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::UndoAccumulated { .. } => "undo_accumulated",
            Event::PlaybackStarted { .. } => "playback_started",
            Event::PlaybackStopped { .. } => "playback_stopped",
            Event::PlaybackFailed { .. } => "playback_failed",
            Event::AccumulatorReset { .. } => "accumulator_reset",
            Event::SettingsChanged { .. } => "settings_changed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_tag() {
        let event = Event::PlaybackStopped {
            reason: StopReason::HistoryExhausted,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "playback_stopped");
        assert_eq!(json["reason"], "history_exhausted");
        assert_eq!(event.kind(), "playback_stopped");
    }
}
