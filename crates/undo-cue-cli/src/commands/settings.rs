//! The two settings commands: parse, clamp, persist, echo the stored value.

use undo_cue_core::SettingsStore;

pub fn set_volume(value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SettingsStore::open()?;
    let stored = store.set_volume(value)?;
    println!("volume = {stored}");
    Ok(())
}

pub fn set_delay(value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SettingsStore::open()?;
    let stored = store.set_delay(value)?;
    println!("assistance_delay = {stored}");
    Ok(())
}
