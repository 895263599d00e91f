//! Logging setup.
//!
//! Logs go to stderr so stdout stays clean for JSON output. `UNDO_CUE_LOG`
//! takes any `EnvFilter` directive and overrides `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "UNDO_CUE_LOG";

pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "info,undo_cue_core=debug,undo_cue=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();

    tracing::debug!(verbose, "logging initialized");
}
