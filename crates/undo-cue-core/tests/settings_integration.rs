//! Integration tests for the settings write operations.

use undo_cue_core::{
    Config, CoreError, ManualClock, MemorySink, Session, SettingsProvider, SettingsStore,
    ValidationError,
};

fn session(dir: &tempfile::TempDir) -> Session<MemorySink, ManualClock> {
    let store = SettingsStore::open_at(dir.path().join("config.toml")).unwrap();
    Session::activate(store, MemorySink::new(), ManualClock::new(0))
}

#[test]
fn volume_is_clamped_at_both_ends() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(&dir);

    session.set_volume("-1").unwrap();
    assert_eq!(session.settings().volume(), 0.0);
    session.set_volume("2").unwrap();
    assert_eq!(session.settings().volume(), 1.0);
    assert_eq!(session.accumulator().volume(), 1.0);
}

#[test]
fn delay_is_clamped_at_both_ends() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(&dir);

    session.set_delay("-1").unwrap();
    assert_eq!(session.settings().assistance_delay_secs(), 0.0);
    session.set_delay("10").unwrap();
    assert_eq!(session.settings().assistance_delay_secs(), 5.0);
    assert_eq!(session.accumulator().delay_ms(), 5_000);
}

#[test]
fn non_numeric_delay_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(&dir);

    let err = session.set_delay("abc").unwrap_err();
    match err {
        CoreError::Validation(ValidationError::NotANumber { input, .. }) => {
            assert_eq!(input, "abc");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
    assert_eq!(session.settings().assistance_delay_secs(), 0.8);
    assert_eq!(session.accumulator().delay_ms(), 800);
    assert_eq!(
        Config::load_from(session.settings().path())
            .unwrap()
            .assistance_delay,
        0.8
    );
}

#[test]
fn written_values_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut session = session(&dir);
        session.set_volume("0.3").unwrap();
        session.set_delay("1.5").unwrap();
        session.deactivate();
    }
    let session = session(&dir);
    assert_eq!(session.accumulator().volume(), 0.3);
    assert_eq!(session.accumulator().delay_ms(), 1_500);
}
