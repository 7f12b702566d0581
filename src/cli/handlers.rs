use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::cli::args::CacheCommands;
use crate::config::AppConfig;
use crate::db::repository::FeedRepo;
use crate::models::{PhaseResult, PhaseStatus, PrayerName};
use crate::phase::{evaluate, ClockDriver, PhaseEvent, SnapshotCell, TransitionTracker};
use crate::prayer_times::source::{import_feed, load_feed_from, LoadedFeed};
use crate::utils::hijri::{hijri_string, masehi_string};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn status_color(status: PhaseStatus) -> &'static str {
    match status {
        PhaseStatus::Adzan | PhaseStatus::Iqomah => RED,
        PhaseStatus::Sholat | PhaseStatus::Dzikir => GREEN,
        PhaseStatus::Normal => AMBER,
        PhaseStatus::Loading => DIM,
    }
}

/// Feed resolution shared by every command: `--feed` overrides config.toml.
pub fn resolve_feed(
    conn: &Connection,
    config: &AppConfig,
    feed_override: Option<&Path>,
    today: NaiveDate,
) -> Result<LoadedFeed> {
    let path = feed_override.or(config.masjid.feed_path.as_deref());
    load_feed_from(path, config, conn, today).context("Loading today's schedule")
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_at(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| anyhow!("Invalid time '{}'. Use HH:MM or HH:MM:SS", s))
}

fn describe(result: &PhaseResult) -> String {
    match (result.status, result.next) {
        (PhaseStatus::Normal, Some(next)) => format!("{} in {}", next, result.display_text),
        (PhaseStatus::Iqomah, Some(prayer)) => format!("iqomah {} in {}", prayer, result.display_text),
        (status, Some(prayer)) => format!("{} ({})", status.as_str().to_uppercase(), prayer),
        (_, None) => result.display_text.clone(),
    }
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(conn: &Connection, config: &AppConfig, feed: Option<&Path>) -> Result<()> {
    let now = Local::now().naive_local();
    let loaded = resolve_feed(conn, config, feed, now.date())?;
    let schedule = &loaded.feed.jadwal;
    let result = evaluate(schedule, &loaded.feed.config.phases, now.time());
    let current_minute = now.time().hour() * 60 + now.time().minute();

    println!();
    println_colored!(GOLD, "  {}", config.masjid.name);
    println_colored!(
        DIM,
        "  {}  ·  {}",
        masehi_string(now.date()),
        hijri_string(now.date(), config.salah.hijri_offset)
    );
    if loaded.origin.is_offline() {
        println_colored!(AMBER, "  Source: {}", loaded.origin.label());
    }
    println!();

    for name in PrayerName::all() {
        let time_str = schedule
            .minute_of(name)
            .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
            .unwrap_or_else(|| "--:--".to_string());
        let marker = if result.next == Some(name) { "▸" } else { " " };
        let is_past = schedule.minute_of(name).is_some_and(|m| m < current_minute);
        let color = if result.next == Some(name) {
            status_color(result.status)
        } else if is_past || !name.is_wajib() {
            DIM
        } else {
            BOLD
        };
        println_colored!(color, "  {} {:<10}  {}", marker, name.display_name(), time_str);
    }

    println!();
    println_colored!(status_color(result.status), "  {}", describe(&result));
    println!();
    Ok(())
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn handle_status(
    conn: &Connection,
    config: &AppConfig,
    feed: Option<&Path>,
    at: Option<&str>,
    json: bool,
) -> Result<()> {
    let now = Local::now().naive_local();
    let time = match at {
        Some(s) => parse_at(s)?,
        None => now.time(),
    };
    let loaded = resolve_feed(conn, config, feed, now.date())?;
    let result = evaluate(&loaded.feed.jadwal, &loaded.feed.config.phases, time);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{}\t{}\t{}",
            result.status,
            result.display_text,
            result.next.map(|n| n.display_name()).unwrap_or("-")
        );
    }
    Ok(())
}

// ─── Watch ───────────────────────────────────────────────────────────────────

pub fn handle_watch(conn: &Connection, config: &AppConfig, feed: Option<&Path>) -> Result<()> {
    let today = Local::now().date_naive();
    let loaded = resolve_feed(conn, config, feed, today)?;
    println_colored!(DIM, "  Source: {}  (Ctrl+C to stop)", loaded.origin.label());

    let cell = SnapshotCell::new(loaded.into_snapshot());
    let (_driver, ticks) = ClockDriver::channel(
        cell.clone(),
        || Local::now().naive_local(),
        Duration::from_millis(config.display.tick_ms.max(100)),
    );

    let reload_every = Duration::from_secs(config.display.reload_minutes.max(1) * 60);
    let mut last_reload = Instant::now();
    let mut loaded_for = today;
    let mut tracker = TransitionTracker::new();

    for tick in ticks.iter() {
        for event in tracker.observe(&tick.phase) {
            let stamp = tick.now.format("%H:%M:%S");
            match event {
                PhaseEvent::Entered { status, prayer } => {
                    let label = match prayer {
                        Some(p) => format!("{} ({})", status.as_str().to_uppercase(), p),
                        None => status.as_str().to_uppercase(),
                    };
                    println_colored!(status_color(status), "  {}  {}  {}", stamp, label, describe(&tick.phase));
                }
                PhaseEvent::IqomahBeep { seconds_left } => {
                    println_colored!(RED, "  {}  beep ({}s)\x07", stamp, seconds_left);
                }
            }
        }

        let date = tick.now.date();
        if date != loaded_for || last_reload.elapsed() >= reload_every {
            match resolve_feed(conn, config, feed, date) {
                Ok(fresh) => {
                    info!("Reloaded schedule ({})", fresh.origin.label());
                    cell.replace(fresh.into_snapshot());
                    loaded_for = date;
                }
                Err(e) => warn!("Reload failed, keeping current schedule: {:#}", e),
            }
            last_reload = Instant::now();
        }
    }
    Ok(())
}

// ─── Import / cache ──────────────────────────────────────────────────────────

pub fn handle_import(conn: &Connection, path: &Path) -> Result<()> {
    let today = Local::now().date_naive();
    let feed = import_feed(conn, path, today)?;
    if feed.jadwal.has_anchor() {
        println_colored!(GREEN, "  ✓ Feed stored for {}", today.format("%Y-%m-%d"));
    } else {
        println_colored!(
            AMBER,
            "  Feed stored for {}, but it has no valid Subuh time; the clock will show loading",
            today.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub fn handle_cache(conn: &Connection, action: &CacheCommands) -> Result<()> {
    match action {
        CacheCommands::Show => {
            let rows = FeedRepo::list_dates(conn)?;
            if rows.is_empty() {
                println_colored!(DIM, "  Cache is empty");
            }
            for (date, fetched_at) in rows {
                println!("  {}  {}", date, fetched_at);
            }
        }
        CacheCommands::Clear => {
            let n = FeedRepo::clear_all(conn)?;
            println_colored!(GREEN, "  ✓ Removed {} cached feed(s)", n);
        }
    }
    Ok(())
}
