use anyhow::Result;
use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::AppConfig;
use crate::db::repository::FeedRepo;
use crate::models::{Feed, FeedConfig, FeedOrigin, SignageConfig};
use crate::phase::ScheduleSnapshot;
use crate::prayer_times::ScheduleCalculator;

/// How many days of feeds the cache keeps around.
const CACHE_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Reading feed {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing feed {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No usable schedule: {0}")]
    Calculation(String),
}

#[derive(Debug, Clone)]
pub struct LoadedFeed {
    pub feed: Feed,
    pub origin: FeedOrigin,
}

impl LoadedFeed {
    pub fn into_snapshot(self) -> ScheduleSnapshot {
        ScheduleSnapshot::new(self.feed, self.origin)
    }
}

/// Read and parse a feed file, returning the parsed feed and its raw body.
pub fn read_feed_file(path: &Path) -> Result<(Feed, String), FeedError> {
    let body = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let feed = serde_json::from_str(&body).map_err(|source| FeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((feed, body))
}

/// Validate a feed file and put it in the cache under `date`.
pub fn import_feed(conn: &Connection, path: &Path, date: NaiveDate) -> Result<Feed> {
    let (feed, body) = read_feed_file(path)?;
    let date_str = date.format("%Y-%m-%d").to_string();
    FeedRepo::store(conn, &date_str, &body)?;
    let cutoff = (date - Duration::days(CACHE_RETENTION_DAYS))
        .format("%Y-%m-%d")
        .to_string();
    let pruned = FeedRepo::prune_before(conn, &cutoff)?;
    if pruned > 0 {
        debug!("Pruned {} cached feeds older than {}", pruned, cutoff);
    }
    Ok(feed)
}

/// Resolve today's feed: the given file first (refreshing the cache), then
/// the last cached feed, then a schedule computed from coordinates.
pub fn load_feed_from(
    feed_path: Option<&Path>,
    config: &AppConfig,
    conn: &Connection,
    today: NaiveDate,
) -> Result<LoadedFeed> {
    if let Some(path) = feed_path {
        match import_feed(conn, path, today) {
            Ok(feed) => {
                info!("Loaded feed from {:?}", path);
                return Ok(LoadedFeed {
                    feed,
                    origin: FeedOrigin::File,
                });
            }
            Err(e) => warn!("Feed unavailable, trying cache: {:#}", e),
        }
    }

    if let Some(cached) = FeedRepo::latest(conn)? {
        match serde_json::from_str::<Feed>(&cached.body) {
            Ok(feed) => {
                let today_str = today.format("%Y-%m-%d").to_string();
                if cached.date != today_str {
                    warn!("Using cached feed from {} (today is {})", cached.date, today_str);
                } else {
                    info!("Using cached feed from {}", cached.date);
                }
                return Ok(LoadedFeed {
                    feed,
                    origin: FeedOrigin::Cache { date: cached.date },
                });
            }
            Err(e) => warn!("Cached feed for {} is unreadable: {}", cached.date, e),
        }
    }

    let schedule = ScheduleCalculator::from_config(&config.salah)
        .and_then(|calc| calc.schedule_for(today))
        .map_err(|e| FeedError::Calculation(format!("{:#}", e)))?;
    info!(
        "No feed available, calculated schedule for {}",
        config.salah.location_name
    );
    Ok(LoadedFeed {
        feed: Feed {
            jadwal: schedule,
            config: FeedConfig {
                phases: config.phases,
                signage: SignageConfig::default(),
            },
        },
        origin: FeedOrigin::Calculated,
    })
}
