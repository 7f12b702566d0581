//! The prayer-time phase clock.
//!
//! [`evaluate`] is a pure function of the schedule, the phase durations and
//! the current wall-clock time. Nothing about "which prayer fired last" is
//! remembered between calls; it is re-derived from `now` every tick.
//!
//! Times are local wall-clock times with no timezone handling. Schedules are
//! assumed to be strictly increasing through the day; a schedule where, say,
//! Ashar precedes Dzuhur still yields a defined result but not a meaningful one.

use chrono::{NaiveTime, Timelike};

use crate::models::{PhaseConfig, PhaseResult, PhaseStatus, PrayerName, PrayerSchedule};
use crate::utils::format::{format_countdown, format_iqomah};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

pub fn evaluate(schedule: &PrayerSchedule, config: &PhaseConfig, now: NaiveTime) -> PhaseResult {
    if !schedule.has_anchor() {
        return PhaseResult::loading();
    }

    let current = now.hour() * 60 + now.minute();
    let second = now.second();
    let entries = schedule.entries();

    // The whole adzan minute reads as one static label.
    let adzan_now = entries
        .iter()
        .any(|(name, minute)| name.is_wajib() && *minute == Some(current));
    if adzan_now {
        return PhaseResult::new(PhaseStatus::Adzan, "ADZAN", None);
    }

    let last_prayer = entries.iter().rev().find_map(|(name, minute)| match minute {
        Some(m) if name.is_wajib() && *m < current => Some((*name, *m)),
        _ => None,
    });

    if let Some((prayer, minute)) = last_prayer {
        if let Some(result) = post_adzan(prayer, current - minute, second, config) {
            return result;
        }
    }

    countdown(schedule, &entries, current, second)
}

/// Iqomah, sholat or dzikir, or `None` once all three windows have passed.
fn post_adzan(
    prayer: PrayerName,
    elapsed_minutes: u32,
    second: u32,
    config: &PhaseConfig,
) -> Option<PhaseResult> {
    let elapsed = u64::from(elapsed_minutes);
    let iqomah = u64::from(config.iqomah_minutes);
    let sholat = iqomah + u64::from(config.sholat_minutes);
    let dzikir = sholat + u64::from(config.dzikir_minutes);

    if elapsed < iqomah {
        let seconds_left = iqomah * 60 - (elapsed * 60 + u64::from(second));
        let text = format_iqomah(seconds_left as i64);
        return Some(PhaseResult::new(PhaseStatus::Iqomah, text, Some(prayer)));
    }
    if elapsed < sholat {
        return Some(PhaseResult::new(PhaseStatus::Sholat, "SHOLAT", Some(prayer)));
    }
    if elapsed < dzikir {
        return Some(PhaseResult::new(PhaseStatus::Dzikir, "DZIKIR", Some(prayer)));
    }
    None
}

/// Countdown to the earliest entry later than now. After the last entry of
/// the day it counts toward tomorrow's Subuh, never Imsak.
fn countdown(
    schedule: &PrayerSchedule,
    entries: &[(PrayerName, Option<u32>)],
    current: u32,
    second: u32,
) -> PhaseResult {
    let upcoming = entries
        .iter()
        .filter_map(|(name, minute)| minute.filter(|m| *m > current).map(|m| (*name, m)))
        .min_by_key(|(_, minute)| *minute);

    let (target, target_minute) = match upcoming {
        Some(found) => found,
        None => match schedule.minute_of(PrayerName::Subuh) {
            Some(minute) => (PrayerName::Subuh, minute),
            None => return PhaseResult::loading(),
        },
    };

    let mut diff = i64::from(target_minute) * 60 - (i64::from(current) * 60 + i64::from(second));
    if diff < 0 {
        diff += SECONDS_PER_DAY;
    }

    PhaseResult::new(PhaseStatus::Normal, format_countdown(diff), Some(target))
}
