use anyhow::{anyhow, Result};
use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime};
use salah::prelude::{
    Configuration, Coordinates, Madhab, Method, Prayer, PrayerSchedule as SalahSchedule,
};

use crate::config::settings::SalahConfig;
use crate::models::PrayerSchedule;

/// Imsak sits a fixed ten minutes before Subuh.
const IMSAK_BEFORE_SUBUH: i64 = 10;
/// Dhuha is shown a quarter hour after sunrise.
const DHUHA_AFTER_SYURUQ: i64 = 15;

/// Computes a day's schedule offline from coordinates, for when no feed has
/// ever been received.
pub struct ScheduleCalculator {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: i32,
}

impl ScheduleCalculator {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    pub fn from_config(salah: &SalahConfig) -> Result<Self> {
        Self::new(
            salah.latitude,
            salah.longitude,
            &salah.calc_method,
            &salah.madhab,
            salah.timezone_offset,
        )
    }

    pub fn schedule_for(&self, date: NaiveDate) -> Result<PrayerSchedule> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = SalahSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;

        let to_local = |utc: chrono::DateTime<chrono::Utc>| -> NaiveTime {
            utc.with_timezone(&offset).time()
        };
        let hhmm = |t: NaiveTime| Some(t.format("%H:%M").to_string());

        let subuh = to_local(times.time(Prayer::Fajr));
        let syuruq = to_local(times.time(Prayer::Sunrise));

        Ok(PrayerSchedule {
            imsak: hhmm(subuh - Duration::minutes(IMSAK_BEFORE_SUBUH)),
            subuh: hhmm(subuh),
            syuruq: hhmm(syuruq),
            dhuha: hhmm(syuruq + Duration::minutes(DHUHA_AFTER_SYURUQ)),
            dzuhur: hhmm(to_local(times.time(Prayer::Dhuhr))),
            ashar: hhmm(to_local(times.time(Prayer::Asr))),
            maghrib: hhmm(to_local(times.time(Prayer::Maghrib))),
            isya: hhmm(to_local(times.time(Prayer::Isha))),
        })
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;

    #[test]
    fn rejects_unknown_method_and_madhab() {
        assert!(ScheduleCalculator::new(0.0, 0.0, "Nope", "Shafi", 0).is_err());
        assert!(ScheduleCalculator::new(0.0, 0.0, "Singapore", "Maliki", 0).is_err());
    }

    #[test]
    fn computes_an_ordered_day_for_jakarta() {
        let calc = ScheduleCalculator::from_config(&SalahConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let schedule = calc.schedule_for(date).unwrap();

        let minutes: Vec<u32> = PrayerName::all()
            .iter()
            .map(|name| schedule.minute_of(*name).unwrap())
            .collect();
        assert!(minutes.windows(2).all(|w| w[0] < w[1]), "not increasing: {minutes:?}");

        let subuh = schedule.minute_of(PrayerName::Subuh).unwrap();
        assert_eq!(schedule.minute_of(PrayerName::Imsak), Some(subuh - 10));
        // Jakarta dawn is always somewhere between 04:00 and 05:00 local.
        assert!((240..300).contains(&subuh), "subuh at minute {subuh}");
    }
}
