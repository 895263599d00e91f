//! Scripted undo bursts against an in-memory document.
//!
//! Time is simulated with a manual clock, so results are deterministic.
//! With `--play` the gaps are also slept for real so the cue is audible.

use std::time::Duration;

use clap::Args;
use serde::Serialize;
use undo_cue_core::{
    AudioSink, Event, ManualClock, MemorySink, ProcessSink, ScratchEditor, Session, SettingsStore,
    TextBuffer,
};

use super::bundled_sound;

#[derive(Args)]
pub struct SimulateArgs {
    /// Offsets in milliseconds at which undo is pressed, e.g. 0,150,300
    #[arg(long, value_delimiter = ',', required = true)]
    at: Vec<u64>,
    /// Number of undoable edits in the document
    #[arg(long, default_value = "50")]
    history: usize,
    /// Assistance delay in seconds for this run only
    #[arg(long)]
    delay: Option<f64>,
    /// Use the real audio player
    #[arg(long)]
    play: bool,
}

#[derive(Serialize)]
struct Step<'a> {
    t_ms: u64,
    #[serde(flatten)]
    event: &'a Event,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::open()?;
    let player = store.config().player;
    let mut overrides = store.config().clone();
    if let Some(delay) = args.delay {
        overrides.assistance_delay = delay;
    }

    let sink: Box<dyn AudioSink> = if args.play {
        Box::new(ProcessSink::new(player))
    } else {
        Box::new(MemorySink::new())
    };
    let clock = ManualClock::new(0);
    let mut session =
        Session::activate_with_asset(store, sink, clock.clone(), bundled_sound());
    session.accumulator_mut().apply_settings(&overrides);
    let mut editor = ScratchEditor::new(Some(TextBuffer::with_history(args.history)));

    let mut offsets = args.at;
    offsets.sort_unstable();
    let mut now = 0;

    for t in offsets {
        advance_to(&mut session, &clock, &mut now, t, args.play)?;
        if let Some(event) = session.undo_pressed(&mut editor)? {
            emit(t, &event)?;
        }
    }

    // Let the stop-timer run out.
    if let Some(due_in) = session.accumulator().stop_due_in_ms() {
        let end = now + due_in;
        advance_to(&mut session, &clock, &mut now, end, args.play)?;
    }

    emit(now, &session.deactivate())?;
    Ok(())
}

/// Move simulated time to `target`, firing the stop-timer on the way if it
/// falls due first.
fn advance_to(
    session: &mut Session<Box<dyn AudioSink>, ManualClock>,
    clock: &ManualClock,
    now: &mut u64,
    target: u64,
    real_time: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(due_in) = session.accumulator().stop_due_in_ms() {
        let due = *now + due_in;
        if due <= target {
            sleep_if(real_time, due - *now);
            *now = due;
            clock.set(due);
            if let Some(event) = session.tick() {
                emit(due, &event)?;
            }
        }
    }
    sleep_if(real_time, target - *now);
    *now = target;
    clock.set(target);
    if let Some(event) = session.tick() {
        emit(target, &event)?;
    }
    Ok(())
}

fn sleep_if(real_time: bool, ms: u64) {
    if real_time && ms > 0 {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

fn emit(t_ms: u64, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(&Step { t_ms, event })?);
    Ok(())
}
