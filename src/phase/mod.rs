pub mod driver;
pub mod evaluator;
pub mod transitions;

pub use driver::{ClockDriver, ScheduleSnapshot, SnapshotCell, Tick};
pub use evaluator::evaluate;
pub use transitions::{PhaseEvent, TransitionTracker};
