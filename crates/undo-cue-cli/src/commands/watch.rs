//! Live session on a single-threaded runtime.
//!
//! stdin lines stand in for editor commands:
//!
//! ```text
//! type <text>   append text as one undoable edit
//! delete <n>    remove n characters from the end
//! u | undo      the wrapped undo command
//! volume <v>    set volume
//! delay <s>     set assistance delay
//! status        print a state snapshot
//! reload        re-read the settings file
//! q | quit      deactivate and exit
//! ```
//!
//! The stop-timer deadline and a once-per-second settings-file check are
//! awaited alongside stdin, so every mutation happens on one task.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use undo_cue_core::{ProcessSink, ScratchEditor, Session, SettingsStore, SystemClock, TextBuffer};

use super::{bundled_sound, print_event};

type LiveSession = Session<ProcessSink, SystemClock>;

const SETTINGS_POLL: Duration = Duration::from_secs(1);

enum Flow {
    Continue,
    Quit,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(watch())
}

async fn watch() -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::open()?;
    let sink = ProcessSink::new(store.config().player);
    let mut session =
        Session::activate_with_asset(store, sink, SystemClock::new(), bundled_sound());
    let mut editor = ScratchEditor::new(Some(TextBuffer::new()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut settings_poll = tokio::time::interval(SETTINGS_POLL);
    settings_poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let stop_due = session.accumulator().stop_due_in_ms();
        let stop_timer = async move {
            match stop_due {
                Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle_line(&mut session, &mut editor, line.trim())? {
                    break;
                }
            }
            _ = stop_timer => {
                if let Some(event) = session.tick() {
                    print_event(&event)?;
                }
            }
            _ = settings_poll.tick() => {
                if let Some(event) = session.poll_settings() {
                    print_event(&event)?;
                }
                if let Some(event) = session.tick() {
                    print_event(&event)?;
                }
            }
        }
    }

    print_event(&session.deactivate())?;
    Ok(())
}

fn handle_line(
    session: &mut LiveSession,
    editor: &mut ScratchEditor,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "" => {}
        "q" | "quit" | "exit" => return Ok(Flow::Quit),
        "u" | "undo" => {
            if let Some(event) = session.tick() {
                print_event(&event)?;
            }
            match session.undo_pressed(editor) {
                Ok(Some(event)) => print_event(&event)?,
                Ok(None) => {}
                Err(e) => eprintln!("error: {e}"),
            }
        }
        "type" => {
            if let Some(buffer) = editor.buffer_mut() {
                buffer.insert(rest);
            }
        }
        "delete" => match rest.trim().parse::<usize>() {
            Ok(n) => {
                if let Some(buffer) = editor.buffer_mut() {
                    buffer.delete_back(n);
                }
            }
            Err(_) => eprintln!("error: delete expects a character count"),
        },
        "volume" => match session.set_volume(rest) {
            Ok(event) => print_event(&event)?,
            Err(e) => eprintln!("error: {e}"),
        },
        "delay" => match session.set_delay(rest) {
            Ok(event) => print_event(&event)?,
            Err(e) => eprintln!("error: {e}"),
        },
        "reload" => {
            if let Some(event) = session.settings_changed() {
                print_event(&event)?;
            }
        }
        "status" => print_event(&session.snapshot())?,
        other => eprintln!("error: unknown command '{other}'"),
    }
    Ok(Flow::Continue)
}
