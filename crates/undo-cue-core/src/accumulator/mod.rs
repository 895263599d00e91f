mod engine;
mod stop_timer;

pub use engine::{AccumulatorState, StopReason, UndoAccumulator, UndoOutcome};
pub use stop_timer::{PendingStop, StopTimer, STOP_TIMER_MS};
