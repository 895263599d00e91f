use undo_cue_core::audio::{resolve_sound, AudioSink};
use undo_cue_core::settings::clamp_volume;
use undo_cue_core::{ProcessSink, SettingsStore};

use super::bundled_sound;

/// Play the cue through the configured player and wait for it to finish.
pub fn run(volume: Option<f64>) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::open()?;
    let config = store.config();
    let sound = resolve_sound(config.sound_path.as_deref(), bundled_sound());
    let volume = clamp_volume(volume.unwrap_or(config.volume));

    let mut sink = ProcessSink::new(config.player);
    sink.start(&sound, volume)?;
    tracing::info!(path = %sound.display(), volume, "playing cue");
    sink.wait()?;
    Ok(())
}
