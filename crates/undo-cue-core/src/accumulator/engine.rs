//! Undo accumulator implementation.
//!
//! Turns a stream of undo outcomes into start/stop commands for an audio
//! sink. Elapsed wall-clock time between consecutive effective undos is
//! summed into a threshold; once it reaches the assistance delay the cue
//! plays. A short stop-timer, re-armed by every effective undo, ends
//! playback once the undos stop coming.
//!
//! Like the rest of the crate it has no internal thread: the host must call
//! [`UndoAccumulator::tick`] to let the stop-timer fire.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Accumulating -> Playing
//!   ^          |             |
//!   +----------+-------------+   (no-op undo, stop-timer expiry, shutdown)
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::stop_timer::{PendingStop, StopTimer};
use crate::audio::AudioSink;
use crate::clock::{Clock, SystemClock};
use crate::events::Event;
use crate::settings::{clamp_delay, clamp_volume, SettingsProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccumulatorState {
    /// Nothing accumulated, nothing playing.
    Idle,
    /// Some undo pressure accumulated, below the delay.
    Accumulating,
    /// The cue is playing.
    Playing,
}

/// Why accumulated state was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// An undo left the document unchanged.
    HistoryExhausted,
    /// The stop-timer expired with no further undo.
    Idle,
    /// The host shut the session down.
    Deactivated,
}

/// Result of one invocation of the host's native undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The document version moved.
    Changed,
    /// Nothing left to undo.
    Unchanged,
}

impl UndoOutcome {
    pub fn from_versions(before: u64, after: u64) -> Self {
        if before == after {
            UndoOutcome::Unchanged
        } else {
            UndoOutcome::Changed
        }
    }
}

pub struct UndoAccumulator<S, C = SystemClock> {
    sink: S,
    clock: C,
    sound: PathBuf,
    volume: f64,
    /// Assistance delay converted to milliseconds.
    delay_ms: u64,
    /// Accumulated undo pressure in milliseconds.
    threshold_ms: u64,
    /// Time of the previous effective undo in the current burst.
    last_event_ms: Option<u64>,
    is_playing: bool,
    stop_timer: StopTimer,
}

impl<S: AudioSink, C: Clock> UndoAccumulator<S, C> {
    /// Create an idle accumulator configured from `settings`.
    pub fn new(settings: &impl SettingsProvider, sink: S, clock: C, sound: PathBuf) -> Self {
        let mut acc = Self {
            sink,
            clock,
            sound,
            volume: 0.0,
            delay_ms: 0,
            threshold_ms: 0,
            last_event_ms: None,
            is_playing: false,
            stop_timer: StopTimer::default(),
        };
        acc.apply_settings(settings);
        acc
    }

    /// Replace the stop-timer, e.g. to use a different window.
    pub fn with_stop_timer(mut self, stop_timer: StopTimer) -> Self {
        self.stop_timer = stop_timer;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AccumulatorState {
        if self.is_playing {
            AccumulatorState::Playing
        } else if self.threshold_ms > 0 {
            AccumulatorState::Accumulating
        } else {
            AccumulatorState::Idle
        }
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn last_event_ms(&self) -> Option<u64> {
        self.last_event_ms
    }

    pub fn sound(&self) -> &Path {
        &self.sound
    }

    pub fn pending_stop(&self) -> Option<PendingStop> {
        self.stop_timer.pending()
    }

    /// Milliseconds until the stop-timer fires, if armed.
    pub fn stop_due_in_ms(&self) -> Option<u64> {
        self.stop_timer.due_in_ms(self.clock.now_ms())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            threshold_ms: self.threshold_ms,
            delay_ms: self.delay_ms,
            volume: self.volume,
            is_playing: self.is_playing,
            stop_due_in_ms: self.stop_due_in_ms(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Refresh volume and delay after a settings change.
    ///
    /// Takes effect from the next qualifying undo; an active playback is
    /// left alone.
    pub fn apply_settings(&mut self, settings: &impl SettingsProvider) -> Event {
        self.volume = clamp_volume(settings.volume());
        let delay_secs = clamp_delay(settings.assistance_delay_secs());
        self.delay_ms = (delay_secs * 1000.0).round() as u64;
        tracing::debug!(volume = self.volume, delay_ms = self.delay_ms, "settings applied");
        Event::SettingsChanged {
            volume: self.volume,
            assistance_delay_secs: delay_secs,
            at: Utc::now(),
        }
    }

    /// Feed the outcome of one undo invocation.
    pub fn observe(&mut self, outcome: UndoOutcome) -> Event {
        match outcome {
            UndoOutcome::Changed => self.on_qualifying_undo(),
            UndoOutcome::Unchanged => self.reset(StopReason::HistoryExhausted),
        }
    }

    /// An undo that actually altered the document.
    pub fn on_qualifying_undo(&mut self) -> Event {
        let now = self.clock.now_ms();
        let last = *self.last_event_ms.get_or_insert(now);
        // An out-of-order timestamp contributes nothing rather than going negative.
        let elapsed = now.saturating_sub(last);
        self.last_event_ms = Some(now);
        self.threshold_ms = self.threshold_ms.saturating_add(elapsed);
        self.stop_timer.arm(now);

        tracing::debug!(
            elapsed_ms = elapsed,
            threshold_ms = self.threshold_ms,
            delay_ms = self.delay_ms,
            "undo accumulated"
        );

        if self.threshold_ms >= self.delay_ms && !self.is_playing {
            return self.start_playback();
        }

        Event::UndoAccumulated {
            threshold_ms: self.threshold_ms,
            delay_ms: self.delay_ms,
            at: Utc::now(),
        }
    }

    /// Call periodically. Fires the stop-timer when due and picks up
    /// asynchronous playback failures.
    pub fn tick(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        if self.stop_timer.take_if_due(now).is_some() {
            return Some(self.reset(StopReason::Idle));
        }

        if self.is_playing {
            if let Some(err) = self.sink.poll_failure() {
                self.is_playing = false;
                tracing::warn!(error = %err, "playback failed");
                return Some(Event::PlaybackFailed {
                    message: err.to_string(),
                    at: Utc::now(),
                });
            }
        }
        None
    }

    /// Stop playback if active and return to the initial state.
    pub fn shutdown(&mut self) -> Event {
        self.reset(StopReason::Deactivated)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start_playback(&mut self) -> Event {
        match self.sink.start(&self.sound, self.volume) {
            Ok(()) => {
                self.is_playing = true;
                tracing::info!(
                    threshold_ms = self.threshold_ms,
                    delay_ms = self.delay_ms,
                    volume = self.volume,
                    "undo cue started"
                );
                Event::PlaybackStarted {
                    threshold_ms: self.threshold_ms,
                    volume: self.volume,
                    at: Utc::now(),
                }
            }
            Err(err) => {
                self.is_playing = false;
                tracing::warn!(
                    error = %err,
                    path = %self.sound.display(),
                    "could not start undo cue"
                );
                Event::PlaybackFailed {
                    message: err.to_string(),
                    at: Utc::now(),
                }
            }
        }
    }

    fn reset(&mut self, reason: StopReason) -> Event {
        self.stop_timer.cancel();
        let discarded_ms = std::mem::take(&mut self.threshold_ms);
        self.last_event_ms = None;

        if self.is_playing {
            self.sink.stop();
            self.is_playing = false;
            tracing::info!(?reason, "undo cue stopped");
            return Event::PlaybackStopped {
                reason,
                at: Utc::now(),
            };
        }

        tracing::debug!(?reason, discarded_ms, "accumulator reset");
        Event::AccumulatorReset {
            reason,
            discarded_ms,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MemorySink;
    use crate::clock::ManualClock;
    use crate::settings::Config;

    fn accumulator(delay: f64) -> (UndoAccumulator<MemorySink, ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000);
        let cfg = Config {
            assistance_delay: delay,
            ..Config::default()
        };
        let acc = UndoAccumulator::new(&cfg, MemorySink::new(), clock.clone(), "undo.wav".into());
        (acc, clock)
    }

    #[test]
    fn first_undo_contributes_nothing() {
        let (mut acc, _clock) = accumulator(0.8);
        let event = acc.observe(UndoOutcome::Changed);
        assert_eq!(event.kind(), "undo_accumulated");
        assert_eq!(acc.threshold_ms(), 0);
        assert_eq!(acc.state(), AccumulatorState::Idle);
        assert!(acc.pending_stop().is_some());
    }

    #[test]
    fn crosses_threshold_and_starts_once() {
        let (mut acc, clock) = accumulator(0.3);
        acc.observe(UndoOutcome::Changed);
        for _ in 0..6 {
            clock.advance(100);
            acc.observe(UndoOutcome::Changed);
        }
        assert!(acc.is_playing());
        assert_eq!(acc.state(), AccumulatorState::Playing);
        assert_eq!(acc.threshold_ms(), 600);
        assert_eq!(acc.sink().start_count(), 1);
    }

    #[test]
    fn zero_delay_plays_on_first_undo() {
        let (mut acc, _clock) = accumulator(0.0);
        let event = acc.observe(UndoOutcome::Changed);
        assert_eq!(event.kind(), "playback_started");
        assert!(acc.is_playing());
    }

    #[test]
    fn unchanged_undo_resets_everything() {
        let (mut acc, clock) = accumulator(0.1);
        acc.observe(UndoOutcome::Changed);
        clock.advance(150);
        acc.observe(UndoOutcome::Changed);
        assert!(acc.is_playing());

        let event = acc.observe(UndoOutcome::Unchanged);
        assert!(matches!(
            event,
            Event::PlaybackStopped {
                reason: StopReason::HistoryExhausted,
                ..
            }
        ));
        assert!(!acc.is_playing());
        assert_eq!(acc.threshold_ms(), 0);
        assert_eq!(acc.last_event_ms(), None);
        assert!(acc.pending_stop().is_none());
        assert_eq!(acc.sink().stop_count(), 1);
    }

    #[test]
    fn unchanged_undo_when_idle_does_not_touch_sink() {
        let (mut acc, _clock) = accumulator(0.8);
        let event = acc.observe(UndoOutcome::Unchanged);
        assert!(matches!(event, Event::AccumulatorReset { discarded_ms: 0, .. }));
        assert!(acc.sink().commands().is_empty());
    }

    #[test]
    fn tick_before_deadline_does_nothing() {
        let (mut acc, clock) = accumulator(0.8);
        acc.observe(UndoOutcome::Changed);
        clock.advance(199);
        assert!(acc.tick().is_none());
        assert_eq!(acc.stop_due_in_ms(), Some(1));
        clock.advance(1);
        let event = acc.tick().unwrap();
        assert!(matches!(
            event,
            Event::AccumulatorReset {
                reason: StopReason::Idle,
                ..
            }
        ));
        assert!(acc.tick().is_none());
    }

    #[test]
    fn custom_stop_window() {
        let (acc, clock) = accumulator(0.8);
        let mut acc = acc.with_stop_timer(StopTimer::new(50));
        acc.observe(UndoOutcome::Changed);
        clock.advance(50);
        assert!(acc.tick().is_some());
    }

    #[test]
    fn out_of_order_timestamp_adds_zero() {
        let (mut acc, clock) = accumulator(5.0);
        acc.observe(UndoOutcome::Changed);
        clock.advance(100);
        acc.observe(UndoOutcome::Changed);
        clock.set(900);
        acc.observe(UndoOutcome::Changed);
        assert_eq!(acc.threshold_ms(), 100);
    }

    #[test]
    fn start_failure_leaves_flag_clear() {
        let (mut acc, _clock) = accumulator(0.0);
        acc.sink_mut().fail_next_start("no device");
        let event = acc.observe(UndoOutcome::Changed);
        assert!(matches!(event, Event::PlaybackFailed { .. }));
        assert!(!acc.is_playing());

        // The next effective undo retries.
        let event = acc.observe(UndoOutcome::Changed);
        assert_eq!(event.kind(), "playback_started");
    }

    #[test]
    fn crashed_playback_is_noticed_on_tick() {
        let (mut acc, clock) = accumulator(0.0);
        acc.observe(UndoOutcome::Changed);
        acc.sink_mut().crash("player died");
        clock.advance(50);
        let event = acc.tick().unwrap();
        assert!(matches!(event, Event::PlaybackFailed { .. }));
        assert!(!acc.is_playing());
        assert!(acc.pending_stop().is_some());
    }

    #[test]
    fn apply_settings_clamps_and_converts() {
        let (mut acc, _clock) = accumulator(0.8);
        assert_eq!(acc.delay_ms(), 800);
        let cfg = Config {
            volume: 4.0,
            assistance_delay: 12.0,
            ..Config::default()
        };
        acc.apply_settings(&cfg);
        assert_eq!(acc.volume(), 1.0);
        assert_eq!(acc.delay_ms(), 5_000);
    }

    #[test]
    fn shutdown_stops_active_playback() {
        let (mut acc, _clock) = accumulator(0.0);
        acc.observe(UndoOutcome::Changed);
        let event = acc.shutdown();
        assert!(matches!(
            event,
            Event::PlaybackStopped {
                reason: StopReason::Deactivated,
                ..
            }
        ));
        assert!(!acc.sink().is_active());
        assert!(acc.pending_stop().is_none());
    }

    #[test]
    fn snapshot_reports_pending_stop() {
        let (mut acc, clock) = accumulator(0.8);
        acc.observe(UndoOutcome::Changed);
        clock.advance(50);
        match acc.snapshot() {
            Event::StateSnapshot {
                state,
                delay_ms,
                stop_due_in_ms,
                ..
            } => {
                assert_eq!(state, AccumulatorState::Idle);
                assert_eq!(delay_ms, 800);
                assert_eq!(stop_due_in_ms, Some(150));
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
