use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use std::time::{Duration, Instant};

use crate::models::{PhaseResult, PhaseStatus, SignageConfig};

/// Friday khutbah window, inclusive, in minutes since midnight.
const JUMAT_START: u32 = 11 * 60;
const JUMAT_END: u32 = 13 * 60 + 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Emergency,
    Khutbah,
    Sholat,
    Dzikir,
    Iqomah,
    Adzan,
    Dashboard,
    Info,
}

impl Slide {
    /// Slides the idle playlist cycles through.
    pub const ROTATION: [Slide; 2] = [Slide::Dashboard, Slide::Info];

    pub fn title(&self) -> &'static str {
        match self {
            Slide::Emergency => "Pengumuman Penting",
            Slide::Khutbah => "Khutbah Jumat",
            Slide::Sholat => "Sholat",
            Slide::Dzikir => "Dzikir",
            Slide::Iqomah => "Menuju Iqomah",
            Slide::Adzan => "Adzan",
            Slide::Dashboard => "Jadwal Sholat",
            Slide::Info => "Info",
        }
    }

    /// Header and running-text footer are drawn only around these slides;
    /// every other slide owns the whole screen.
    pub fn shows_running_text(&self) -> bool {
        matches!(self, Slide::Dashboard | Slide::Info | Slide::Adzan)
    }

    /// Blacked-out slides carrying a single dim line.
    pub fn is_quiet(&self) -> bool {
        matches!(self, Slide::Sholat | Slide::Khutbah)
    }
}

pub fn is_jumat_time(now: NaiveDateTime) -> bool {
    let minute = now.hour() * 60 + now.minute();
    now.weekday() == Weekday::Fri && (JUMAT_START..=JUMAT_END).contains(&minute)
}

/// Pick the slide for this tick. Fixed priority: emergency, Friday khutbah,
/// then the prayer phases, then the idle rotation.
pub fn select_slide(
    now: NaiveDateTime,
    phase: &PhaseResult,
    signage: &SignageConfig,
    rotation: usize,
) -> Slide {
    if signage.emergency_mode {
        return Slide::Emergency;
    }
    if is_jumat_time(now) {
        return Slide::Khutbah;
    }
    match phase.status {
        PhaseStatus::Sholat => Slide::Sholat,
        PhaseStatus::Dzikir => Slide::Dzikir,
        PhaseStatus::Iqomah => Slide::Iqomah,
        PhaseStatus::Adzan => Slide::Adzan,
        PhaseStatus::Normal | PhaseStatus::Loading => {
            match Slide::ROTATION[rotation % Slide::ROTATION.len()] {
                // Nothing to show without running text.
                Slide::Info if signage.visi.is_none() => Slide::Dashboard,
                slide => slide,
            }
        }
    }
}

/// Idle rotation position. Advances once per `playlist_interval` and stands
/// still while a prayer phase, khutbah or emergency owns the screen.
#[derive(Debug)]
pub struct Playlist {
    index: usize,
    last_advance: Instant,
}

impl Playlist {
    pub fn new(started: Instant) -> Self {
        Self {
            index: 0,
            last_advance: started,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(
        &mut self,
        at: Instant,
        now: NaiveDateTime,
        phase: &PhaseResult,
        signage: &SignageConfig,
    ) -> Slide {
        let frozen = phase.status.is_prayer_phase() || signage.emergency_mode || is_jumat_time(now);
        if frozen {
            self.last_advance = at;
        } else {
            let interval = Duration::from_secs(u64::from(signage.playlist_interval.max(1)));
            if at.saturating_duration_since(self.last_advance) >= interval {
                self.index = (self.index + 1) % Slide::ROTATION.len();
                self.last_advance = at;
            }
        }
        select_slide(now, phase, signage, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2026-10-16 is a Friday, 2026-10-15 a Thursday.
    fn friday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn thursday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn phase(status: PhaseStatus) -> PhaseResult {
        PhaseResult::new(status, "", None)
    }

    fn with_visi() -> SignageConfig {
        SignageConfig {
            visi: Some("Mari makmurkan masjid".into()),
            ..Default::default()
        }
    }

    #[test]
    fn chrome_only_around_idle_and_adzan_slides() {
        let framed: Vec<_> = [
            Slide::Emergency,
            Slide::Khutbah,
            Slide::Sholat,
            Slide::Dzikir,
            Slide::Iqomah,
            Slide::Adzan,
            Slide::Dashboard,
            Slide::Info,
        ]
        .into_iter()
        .filter(|s| s.shows_running_text())
        .collect();
        assert_eq!(framed, vec![Slide::Adzan, Slide::Dashboard, Slide::Info]);
        assert!(Slide::Sholat.is_quiet());
        assert!(Slide::Khutbah.is_quiet());
        assert!(!Slide::Dzikir.is_quiet());
    }

    #[test]
    fn jumat_window_is_friday_only_and_inclusive() {
        assert!(is_jumat_time(friday(11, 0)));
        assert!(is_jumat_time(friday(13, 30)));
        assert!(!is_jumat_time(friday(10, 59)));
        assert!(!is_jumat_time(friday(13, 31)));
        assert!(!is_jumat_time(thursday(12, 0)));
    }

    #[test]
    fn emergency_beats_everything() {
        let signage = SignageConfig {
            emergency_mode: true,
            ..Default::default()
        };
        assert_eq!(
            select_slide(friday(12, 0), &phase(PhaseStatus::Sholat), &signage, 0),
            Slide::Emergency
        );
    }

    #[test]
    fn khutbah_beats_prayer_phases() {
        let slide = select_slide(friday(12, 5), &phase(PhaseStatus::Iqomah), &with_visi(), 0);
        assert_eq!(slide, Slide::Khutbah);
    }

    #[test]
    fn prayer_phases_map_to_their_slides() {
        let signage = with_visi();
        let now = thursday(18, 10);
        for (status, slide) in [
            (PhaseStatus::Sholat, Slide::Sholat),
            (PhaseStatus::Dzikir, Slide::Dzikir),
            (PhaseStatus::Iqomah, Slide::Iqomah),
            (PhaseStatus::Adzan, Slide::Adzan),
        ] {
            assert_eq!(select_slide(now, &phase(status), &signage, 1), slide);
        }
    }

    #[test]
    fn idle_rotation_skips_info_without_text() {
        let now = thursday(9, 0);
        let normal = phase(PhaseStatus::Normal);
        assert_eq!(select_slide(now, &normal, &with_visi(), 1), Slide::Info);
        assert_eq!(select_slide(now, &normal, &SignageConfig::default(), 1), Slide::Dashboard);
        assert_eq!(select_slide(now, &normal, &with_visi(), 2), Slide::Dashboard);
    }

    #[test]
    fn playlist_advances_on_interval() {
        let start = Instant::now();
        let mut playlist = Playlist::new(start);
        let signage = with_visi();
        let normal = phase(PhaseStatus::Normal);
        let now = thursday(9, 0);

        assert_eq!(playlist.advance(start + Duration::from_secs(14), now, &normal, &signage), Slide::Dashboard);
        assert_eq!(playlist.advance(start + Duration::from_secs(15), now, &normal, &signage), Slide::Info);
        assert_eq!(playlist.advance(start + Duration::from_secs(29), now, &normal, &signage), Slide::Info);
        assert_eq!(playlist.advance(start + Duration::from_secs(30), now, &normal, &signage), Slide::Dashboard);
    }

    #[test]
    fn playlist_freezes_during_prayer_phases() {
        let start = Instant::now();
        let mut playlist = Playlist::new(start);
        let signage = with_visi();
        let now = thursday(18, 2);

        playlist.advance(start + Duration::from_secs(60), now, &phase(PhaseStatus::Iqomah), &signage);
        assert_eq!(playlist.index(), 0);
        // The interval restarts once the phase ends.
        let normal = phase(PhaseStatus::Normal);
        assert_eq!(playlist.advance(start + Duration::from_secs(70), now, &normal, &signage), Slide::Dashboard);
        assert_eq!(playlist.advance(start + Duration::from_secs(75), now, &normal, &signage), Slide::Info);
    }
}
