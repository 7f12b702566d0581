use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::phase::coerce_minutes;
use super::{PhaseConfig, PrayerSchedule};

const DEFAULT_PLAYLIST_INTERVAL: u32 = 15;
const DEFAULT_EMERGENCY_MESSAGE: &str = "Keadaan Darurat - Harap Tenang";

fn default_playlist_interval() -> u32 {
    DEFAULT_PLAYLIST_INTERVAL
}

fn default_emergency_message() -> String {
    DEFAULT_EMERGENCY_MESSAGE.to_string()
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "ya" | "yes" | "on"
        ),
        _ => false,
    })
}

fn lenient_interval<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_minutes)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_PLAYLIST_INTERVAL))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

fn lenient_message<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_else(default_emergency_message))
}

/// Settings for the TV signage screen that ride along in the feed's config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignageConfig {
    /// Seconds each playlist slide stays on screen.
    #[serde(deserialize_with = "lenient_interval")]
    pub playlist_interval: u32,
    #[serde(deserialize_with = "lenient_flag")]
    pub emergency_mode: bool,
    #[serde(deserialize_with = "lenient_message")]
    pub emergency_message: String,
    /// Running text shown on the info slide and in the footer.
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub visi: Option<String>,
}

impl Default for SignageConfig {
    fn default() -> Self {
        Self {
            playlist_interval: default_playlist_interval(),
            emergency_mode: false,
            emergency_message: default_emergency_message(),
            visi: None,
        }
    }
}

/// The `config` object of a feed. Phase durations and signage settings share
/// one flat namespace on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedConfig {
    #[serde(flatten)]
    pub phases: PhaseConfig,
    #[serde(flatten)]
    pub signage: SignageConfig,
}

impl<'de> Deserialize<'de> for FeedConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        let phases = PhaseConfig::from_value(&value);
        let signage = SignageConfig::deserialize(&value).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable signage settings: {}", e);
            SignageConfig::default()
        });
        Ok(Self { phases, signage })
    }
}

/// A `jadwal` that is not an object reads as an empty schedule, which the
/// evaluator shows as loading.
fn lenient_schedule<'de, D>(deserializer: D) -> Result<PrayerSchedule, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(PrayerSchedule::default());
    }
    PrayerSchedule::deserialize(&value).map_err(serde::de::Error::custom)
}

/// Everything the data source hands over for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    #[serde(deserialize_with = "lenient_schedule")]
    pub jadwal: PrayerSchedule,
    pub config: FeedConfig,
}

/// Where the current feed came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOrigin {
    File,
    /// Last good feed from the local cache, stored on `date`.
    Cache { date: String },
    /// Computed locally from coordinates.
    Calculated,
}

impl FeedOrigin {
    pub fn is_offline(&self) -> bool {
        !matches!(self, FeedOrigin::File)
    }

    pub fn label(&self) -> String {
        match self {
            FeedOrigin::File => "feed".to_string(),
            FeedOrigin::Cache { date } => format!("cache {}", date),
            FeedOrigin::Calculated => "calculated".to_string(),
        }
    }
}
