pub mod calculator;
pub mod source;

pub use calculator::ScheduleCalculator;
