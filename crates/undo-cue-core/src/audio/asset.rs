use std::path::{Path, PathBuf};

/// File name of the bundled cue.
pub const DEFAULT_SOUND_FILE: &str = "undo.wav";

/// Environment variable naming a directory that holds the bundled cue.
pub const ASSET_DIR_ENV: &str = "UNDO_CUE_ASSET_DIR";

/// Locate the cue to play.
///
/// Order: explicit override, `$UNDO_CUE_ASSET_DIR/undo.wav`, the host's
/// `bundled` path if it exists, `assets/undo.wav` beside the executable,
/// `assets/undo.wav` in the working directory. The last candidate is
/// returned even if missing so the failure surfaces at play time with a
/// useful path.
pub fn resolve_sound(override_path: Option<&str>, bundled: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    if let Some(dir) = std::env::var_os(ASSET_DIR_ENV) {
        return Path::new(&dir).join(DEFAULT_SOUND_FILE);
    }

    if let Some(path) = bundled.filter(|p| p.exists()) {
        return path.to_path_buf();
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets").join(DEFAULT_SOUND_FILE)));
    if let Some(path) = beside_exe.filter(|p| p.exists()) {
        return path;
    }

    Path::new("assets").join(DEFAULT_SOUND_FILE)
}
