use crate::models::{PhaseResult, PhaseStatus, PrayerName};
use crate::utils::format::parse_iqomah;

/// The iqomah countdown beeps once for each of its last few seconds.
pub const BEEP_SECONDS: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseEvent {
    Entered {
        status: PhaseStatus,
        prayer: Option<PrayerName>,
    },
    IqomahBeep {
        seconds_left: i64,
    },
}

/// Seconds remaining in an iqomah result, `None` for any other phase.
pub fn iqomah_seconds_left(result: &PhaseResult) -> Option<i64> {
    if result.status != PhaseStatus::Iqomah {
        return None;
    }
    parse_iqomah(&result.display_text)
}

/// Turns the stream of per-tick results into edge events.
///
/// Only the previous result is kept, to tell edges from levels. The phase
/// itself always comes from the evaluator, so a tracker that misses ticks
/// (or starts mid-phase) reports the phase it lands in and carries on.
#[derive(Debug, Default)]
pub struct TransitionTracker {
    previous: Option<PhaseResult>,
    last_beep: Option<i64>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, result: &PhaseResult) -> Vec<PhaseEvent> {
        let mut events = Vec::new();

        let changed = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.status != result.status);
        if changed {
            events.push(PhaseEvent::Entered {
                status: result.status,
                prayer: match result.status {
                    PhaseStatus::Normal | PhaseStatus::Loading => None,
                    _ => result.next,
                },
            });
        }

        match iqomah_seconds_left(result) {
            Some(left) if (1..=BEEP_SECONDS).contains(&left) && self.last_beep != Some(left) => {
                self.last_beep = Some(left);
                events.push(PhaseEvent::IqomahBeep { seconds_left: left });
            }
            Some(_) => {}
            None => self.last_beep = None,
        }

        self.previous = Some(result.clone());
        events
    }
}
