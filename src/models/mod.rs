pub mod feed;
pub mod phase;
pub mod schedule;

pub use feed::{Feed, FeedConfig, FeedOrigin, SignageConfig};
pub use phase::{PhaseConfig, PhaseResult, PhaseStatus};
pub use schedule::{PrayerName, PrayerSchedule};
