use chrono::NaiveDateTime;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::models::{Feed, FeedOrigin, PhaseResult};
use crate::phase::evaluator::evaluate;

/// One consistent view of the inputs, swapped as a whole when a new feed
/// arrives.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub feed: Feed,
    pub origin: FeedOrigin,
}

impl ScheduleSnapshot {
    pub fn new(feed: Feed, origin: FeedOrigin) -> Self {
        Self { feed, origin }
    }

    pub fn evaluate(&self, now: NaiveDateTime) -> PhaseResult {
        evaluate(&self.feed.jadwal, &self.feed.config.phases, now.time())
    }
}

/// Shared slot holding the current snapshot. Readers get an `Arc` to an
/// immutable snapshot; writers replace the `Arc`, never the fields.
#[derive(Debug, Clone)]
pub struct SnapshotCell {
    inner: Arc<RwLock<Arc<ScheduleSnapshot>>>,
}

impl SnapshotCell {
    pub fn new(snapshot: ScheduleSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn load(&self) -> Arc<ScheduleSnapshot> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn replace(&self, snapshot: ScheduleSnapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}

#[derive(Debug, Clone)]
pub struct Tick {
    pub now: NaiveDateTime,
    pub phase: PhaseResult,
    pub snapshot: Arc<ScheduleSnapshot>,
}

/// Re-evaluates the phase on a fixed interval on its own thread and hands
/// every result to a publisher, whether or not anything is rendering it.
///
/// The loop is a single thread, so ticks can never overlap. It ends when the
/// publisher reports that nobody is listening, or on `stop()`/drop.
pub struct ClockDriver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ClockDriver {
    pub fn spawn<C, P>(cell: SnapshotCell, clock: C, interval: Duration, mut publish: P) -> Self
    where
        C: Fn() -> NaiveDateTime + Send + 'static,
        P: FnMut(Tick) -> bool + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            info!("Clock driver started ({:?} interval)", interval);
            let mut deadline = Instant::now();
            while flag.load(Ordering::Acquire) {
                let now = clock();
                let snapshot = cell.load();
                let phase = snapshot.evaluate(now);
                if !publish(Tick {
                    now,
                    phase,
                    snapshot,
                }) {
                    debug!("Tick consumer went away, stopping clock driver");
                    break;
                }

                deadline += interval;
                let wait = deadline.saturating_duration_since(Instant::now());
                if wait.is_zero() {
                    // Fell behind (suspend, slow consumer): realign instead of bursting.
                    deadline = Instant::now();
                } else {
                    thread::sleep(wait);
                }
            }
            info!("Clock driver stopped");
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Convenience wrapper publishing into a fresh channel.
    pub fn channel<C>(cell: SnapshotCell, clock: C, interval: Duration) -> (Self, mpsc::Receiver<Tick>)
    where
        C: Fn() -> NaiveDateTime + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let driver = Self::spawn(cell, clock, interval, move |tick| tx.send(tick).is_ok());
        (driver, rx)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhaseStatus, PrayerSchedule};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn running(driver: &ClockDriver) -> bool {
        driver.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn snapshot(dzuhur: &str) -> ScheduleSnapshot {
        let feed = Feed {
            jadwal: PrayerSchedule {
                subuh: Some("04:40".into()),
                dzuhur: Some(dzuhur.into()),
                ashar: Some("15:20".into()),
                maghrib: Some("18:05".into()),
                isya: Some("19:15".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        ScheduleSnapshot::new(feed, FeedOrigin::File)
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let cell = SnapshotCell::new(snapshot("12:00"));
        let before = cell.load();
        cell.replace(snapshot("12:05"));
        let after = cell.load();
        // Holders of the old snapshot keep seeing it unchanged.
        assert_eq!(before.feed.jadwal.dzuhur.as_deref(), Some("12:00"));
        assert_eq!(after.feed.jadwal.dzuhur.as_deref(), Some("12:05"));
    }

    #[test]
    fn publishes_ticks_from_the_clock() {
        let cell = SnapshotCell::new(snapshot("12:00"));
        let (mut driver, rx) = ClockDriver::channel(cell, || at(12, 5, 0), Duration::from_millis(5));
        let tick = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(tick.now, at(12, 5, 0));
        assert_eq!(tick.phase.status, PhaseStatus::Iqomah);
        assert_eq!(tick.phase.display_text, "5:00");
        driver.stop();
        assert!(!running(&driver));
    }

    #[test]
    fn picks_up_a_replaced_snapshot() {
        let cell = SnapshotCell::new(snapshot("12:00"));
        let (_driver, rx) = ClockDriver::channel(cell.clone(), || at(12, 5, 0), Duration::from_millis(5));
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap().phase.status, PhaseStatus::Iqomah);

        cell.replace(snapshot("12:05"));
        let swapped = rx
            .iter()
            .find(|tick| tick.snapshot.feed.jadwal.dzuhur.as_deref() == Some("12:05"))
            .unwrap();
        assert_eq!(swapped.phase.status, PhaseStatus::Adzan);
    }

    #[test]
    fn clock_is_read_fresh_every_tick() {
        let cell = SnapshotCell::new(snapshot("12:00"));
        let times = Arc::new(Mutex::new(vec![at(12, 32, 0), at(12, 10, 0), at(12, 0, 0)]));
        let source = Arc::clone(&times);
        let clock = move || {
            let mut times = source.lock().unwrap();
            if times.len() > 1 { times.pop().unwrap() } else { times[0] }
        };
        let (_driver, rx) = ClockDriver::channel(cell, clock, Duration::from_millis(5));
        let statuses: Vec<_> = rx.iter().take(3).map(|t| t.phase.status).collect();
        assert_eq!(
            statuses,
            vec![PhaseStatus::Adzan, PhaseStatus::Sholat, PhaseStatus::Normal]
        );
    }

    #[test]
    fn stops_when_the_receiver_is_dropped() {
        let cell = SnapshotCell::new(snapshot("12:00"));
        let (driver, rx) = ClockDriver::channel(cell, || at(9, 0, 0), Duration::from_millis(1));
        drop(rx);
        let started = Instant::now();
        while running(&driver) && started.elapsed() < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!running(&driver));
    }

    #[test]
    fn callback_publisher_sees_every_tick() {
        let cell = SnapshotCell::new(snapshot("12:00"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut driver = ClockDriver::spawn(cell, || at(12, 0, 30), Duration::from_millis(1), move |tick| {
            let mut seen = sink.lock().unwrap();
            seen.push(tick.phase.status);
            seen.len() < 3
        });
        let started = Instant::now();
        while running(&driver) && started.elapsed() < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(5));
        }
        driver.stop();
        assert_eq!(*seen.lock().unwrap(), vec![PhaseStatus::Adzan; 3]);
    }
}
