pub mod config;
pub mod play;
pub mod settings;
pub mod simulate;
pub mod watch;

use std::path::Path;

use undo_cue_core::Event;

/// The cue shipped in this crate's `assets/` directory.
pub const BUNDLED_SOUND: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/undo.wav");

pub fn bundled_sound() -> Option<&'static Path> {
    Some(Path::new(BUNDLED_SOUND))
}

/// Print an event as one line of JSON on stdout.
pub fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
