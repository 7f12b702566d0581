use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::PhaseConfig;

fn default_masjid_name() -> String {
    "Masjid".to_string()
}
fn default_latitude() -> f64 {
    -6.2088
}
fn default_longitude() -> f64 {
    106.8456
}
fn default_location_name() -> String {
    "Jakarta".to_string()
}
fn default_calc_method() -> String {
    "Singapore".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_timezone_offset() -> i32 {
    420
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_hijri_toggle_secs() -> u64 {
    5
}
fn default_reload_minutes() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasjidConfig {
    #[serde(default = "default_masjid_name")]
    pub name: String,
    /// JSON feed (`{"jadwal": {...}, "config": {...}}`) written by whatever
    /// syncs the mosque's spreadsheet.
    #[serde(default)]
    pub feed_path: Option<PathBuf>,
}

impl Default for MasjidConfig {
    fn default() -> Self {
        Self {
            name: default_masjid_name(),
            feed_path: None,
        }
    }
}

/// Location settings for computing a schedule when no feed is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalahConfig {
    #[serde(default = "default_location_name")]
    pub location_name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for SalahConfig {
    fn default() -> Self {
        Self {
            location_name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// How long the header shows each of the Gregorian and Hijri dates.
    #[serde(default = "default_hijri_toggle_secs")]
    pub hijri_toggle_secs: u64,
    /// Re-read the feed this often so a new day's schedule gets picked up.
    #[serde(default = "default_reload_minutes")]
    pub reload_minutes: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            hijri_toggle_secs: default_hijri_toggle_secs(),
            reload_minutes: default_reload_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub masjid: MasjidConfig,
    #[serde(default)]
    pub salah: SalahConfig,
    /// Durations used for calculated schedules.
    #[serde(default)]
    pub phases: PhaseConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "jadwal")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("jadwal.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
