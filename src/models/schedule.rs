use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// One of the eight named entries on a daily schedule, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Imsak,
    Subuh,
    Syuruq,
    Dhuha,
    Dzuhur,
    Ashar,
    Maghrib,
    Isya,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 8] {
        [
            PrayerName::Imsak,
            PrayerName::Subuh,
            PrayerName::Syuruq,
            PrayerName::Dhuha,
            PrayerName::Dzuhur,
            PrayerName::Ashar,
            PrayerName::Maghrib,
            PrayerName::Isya,
        ]
    }

    /// The five obligatory prayers are the only entries that drive phases.
    pub fn is_wajib(&self) -> bool {
        !matches!(
            self,
            PrayerName::Imsak | PrayerName::Syuruq | PrayerName::Dhuha
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Imsak => "Imsak",
            PrayerName::Subuh => "Subuh",
            PrayerName::Syuruq => "Syuruq",
            PrayerName::Dhuha => "Dhuha",
            PrayerName::Dzuhur => "Dzuhur",
            PrayerName::Ashar => "Ashar",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isya => "Isya",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imsak" => Ok(PrayerName::Imsak),
            "subuh" | "fajr" => Ok(PrayerName::Subuh),
            "syuruq" | "sunrise" => Ok(PrayerName::Syuruq),
            "dhuha" => Ok(PrayerName::Dhuha),
            "dzuhur" | "dhuhr" | "zuhr" => Ok(PrayerName::Dzuhur),
            "ashar" | "asr" => Ok(PrayerName::Ashar),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isya" | "isha" => Ok(PrayerName::Isya),
            _ => Err(anyhow::anyhow!("Unknown prayer name: {}", s)),
        }
    }
}

/// Parse an `H:MM` / `HH:MM` clock string (trailing `:SS` tolerated) into
/// minutes since midnight.
pub fn parse_minute_of_day(s: &str) -> Option<u32> {
    let mut parts = s.trim().split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.trim().parse().ok()?;
    if let Some(sec) = parts.next() {
        let sec: u32 = sec.trim().parse().ok()?;
        if sec >= 60 {
            return None;
        }
    }
    if parts.next().is_some() || hour >= 24 || minute >= 60 {
        return None;
    }
    Some(hour * 60 + minute)
}

fn lenient_time<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// One calendar day of clock times as delivered by the data source.
///
/// Fields stay as raw strings; the evaluator parses them on every tick and
/// treats anything absent or malformed as "never".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerSchedule {
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub imsak: Option<String>,
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub subuh: Option<String>,
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub syuruq: Option<String>,
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub dhuha: Option<String>,
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub dzuhur: Option<String>,
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub ashar: Option<String>,
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub maghrib: Option<String>,
    #[serde(deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub isya: Option<String>,
}

impl PrayerSchedule {
    pub fn get(&self, name: PrayerName) -> Option<&str> {
        let field = match name {
            PrayerName::Imsak => &self.imsak,
            PrayerName::Subuh => &self.subuh,
            PrayerName::Syuruq => &self.syuruq,
            PrayerName::Dhuha => &self.dhuha,
            PrayerName::Dzuhur => &self.dzuhur,
            PrayerName::Ashar => &self.ashar,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isya => &self.isya,
        };
        field.as_deref()
    }

    pub fn minute_of(&self, name: PrayerName) -> Option<u32> {
        self.get(name).and_then(parse_minute_of_day)
    }

    /// Subuh anchors the whole day; without it no phase can be computed.
    pub fn has_anchor(&self) -> bool {
        self.minute_of(PrayerName::Subuh).is_some()
    }

    /// All eight entries in canonical order with their parsed minute values.
    pub fn entries(&self) -> [(PrayerName, Option<u32>); 8] {
        PrayerName::all().map(|name| (name, self.minute_of(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_strings() {
        assert_eq!(parse_minute_of_day("05:00"), Some(300));
        assert_eq!(parse_minute_of_day("5:07"), Some(307));
        assert_eq!(parse_minute_of_day(" 18:45 "), Some(1125));
        assert_eq!(parse_minute_of_day("04:32:00"), Some(272));
        assert_eq!(parse_minute_of_day("00:00"), Some(0));
        assert_eq!(parse_minute_of_day("23:59"), Some(1439));
    }

    #[test]
    fn rejects_garbage_clock_strings() {
        for bad in ["", "12", "24:00", "12:60", "ab:cd", "12:00:75", "1:2:3:4", "-1:30"] {
            assert_eq!(parse_minute_of_day(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn deserializes_non_string_fields_as_absent() {
        let json = r#"{"subuh":"04:40","dzuhur":1200,"ashar":null,"maghrib":"","isya":"19:10","extra":"x"}"#;
        let schedule: PrayerSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.subuh.as_deref(), Some("04:40"));
        assert_eq!(schedule.dzuhur, None);
        assert_eq!(schedule.ashar, None);
        assert_eq!(schedule.maghrib, None);
        assert_eq!(schedule.isya.as_deref(), Some("19:10"));
        assert_eq!(schedule.imsak, None);
    }

    #[test]
    fn anchor_requires_parseable_subuh() {
        assert!(!PrayerSchedule::default().has_anchor());
        let garbled = PrayerSchedule {
            subuh: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(!garbled.has_anchor());
        let valid = PrayerSchedule {
            subuh: Some("04:41".to_string()),
            ..Default::default()
        };
        assert!(valid.has_anchor());
    }

    #[test]
    fn entries_keep_canonical_order() {
        let schedule = PrayerSchedule {
            subuh: Some("04:40".into()),
            isya: Some("19:10".into()),
            ..Default::default()
        };
        let entries = schedule.entries();
        assert_eq!(entries[0], (PrayerName::Imsak, None));
        assert_eq!(entries[1], (PrayerName::Subuh, Some(280)));
        assert_eq!(entries[7], (PrayerName::Isya, Some(1150)));
    }

    #[test]
    fn only_five_names_are_wajib() {
        let wajib: Vec<_> = PrayerName::all().into_iter().filter(|n| n.is_wajib()).collect();
        assert_eq!(
            wajib,
            vec![
                PrayerName::Subuh,
                PrayerName::Dzuhur,
                PrayerName::Ashar,
                PrayerName::Maghrib,
                PrayerName::Isya,
            ]
        );
    }

    #[test]
    fn name_aliases() {
        assert_eq!("Fajr".parse::<PrayerName>().unwrap(), PrayerName::Subuh);
        assert_eq!("dhuhr".parse::<PrayerName>().unwrap(), PrayerName::Dzuhur);
        assert_eq!("ISYA".parse::<PrayerName>().unwrap(), PrayerName::Isya);
        assert!("tahajjud".parse::<PrayerName>().is_err());
    }
}
