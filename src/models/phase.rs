use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::PrayerName;

pub const DEFAULT_PHASE_MINUTES: u32 = 10;

/// Integer prefix of a string, the way a spreadsheet cell like `"15 menit"`
/// is usually meant: optional sign followed by digits.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}

/// Coerce a loosely typed config value to a non-negative minute count.
/// Returns `None` when the value carries no number at all.
pub fn coerce_minutes(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_int(s),
        _ => None,
    }?;
    Some(n.clamp(0, u32::MAX as i64) as u32)
}

/// Accepted spellings per duration, in lookup order: the spreadsheet feed's
/// `durasi_*`, then camel case, then snake case.
const IQOMAH_KEYS: [&str; 3] = ["durasi_iqomah", "iqomahMinutes", "iqomah_minutes"];
const SHOLAT_KEYS: [&str; 3] = ["durasi_sholat", "sholatMinutes", "sholat_minutes"];
const DZIKIR_KEYS: [&str; 3] = ["durasi_dzikir", "dzikirMinutes", "dzikir_minutes"];

/// First key in `keys` whose value carries a number, else the default.
fn lookup_minutes(object: &Map<String, Value>, keys: &[&str]) -> u32 {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(coerce_minutes)
        .unwrap_or(DEFAULT_PHASE_MINUTES)
}

/// Durations of the three post-adzan phases, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseConfig {
    #[serde(rename = "iqomahMinutes")]
    pub iqomah_minutes: u32,
    #[serde(rename = "sholatMinutes")]
    pub sholat_minutes: u32,
    #[serde(rename = "dzikirMinutes")]
    pub dzikir_minutes: u32,
}

impl PhaseConfig {
    /// Read durations out of a loosely typed config object. Never fails:
    /// anything that is not an object, and any missing or garbage field,
    /// yields the default.
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(object) => Self {
                iqomah_minutes: lookup_minutes(object, &IQOMAH_KEYS),
                sholat_minutes: lookup_minutes(object, &SHOLAT_KEYS),
                dzikir_minutes: lookup_minutes(object, &DZIKIR_KEYS),
            },
            None => Self::default(),
        }
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            iqomah_minutes: DEFAULT_PHASE_MINUTES,
            sholat_minutes: DEFAULT_PHASE_MINUTES,
            dzikir_minutes: DEFAULT_PHASE_MINUTES,
        }
    }
}

impl<'de> Deserialize<'de> for PhaseConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Loading,
    Normal,
    Adzan,
    Iqomah,
    Sholat,
    Dzikir,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Loading => "loading",
            PhaseStatus::Normal => "normal",
            PhaseStatus::Adzan => "adzan",
            PhaseStatus::Iqomah => "iqomah",
            PhaseStatus::Sholat => "sholat",
            PhaseStatus::Dzikir => "dzikir",
        }
    }

    /// Adzan and iqomah get the red alert treatment on every screen.
    pub fn is_alert(&self) -> bool {
        matches!(self, PhaseStatus::Adzan | PhaseStatus::Iqomah)
    }

    /// Any phase that belongs to a prayer in progress; the signage playlist
    /// stops rotating during these.
    pub fn is_prayer_phase(&self) -> bool {
        matches!(
            self,
            PhaseStatus::Adzan | PhaseStatus::Iqomah | PhaseStatus::Sholat | PhaseStatus::Dzikir
        )
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the screen should show right now. Recomputed every tick, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseResult {
    pub status: PhaseStatus,
    pub display_text: String,
    /// Upcoming entry during `normal`, the triggering prayer during
    /// iqomah/sholat/dzikir, `None` during adzan and loading.
    pub next: Option<PrayerName>,
}

impl PhaseResult {
    pub fn new(status: PhaseStatus, display_text: impl Into<String>, next: Option<PrayerName>) -> Self {
        Self {
            status,
            display_text: display_text.into(),
            next,
        }
    }

    pub fn loading() -> Self {
        Self::new(PhaseStatus::Loading, "--:--", None)
    }
}
