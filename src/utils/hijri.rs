use chrono::{Datelike, Duration, NaiveDate, Weekday};
use hijri_date::HijriDate;

/// Hijri month names as written on Indonesian mosque boards
/// (index 0 = Muharram = month 1).
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabiul Awal",
    "Rabiul Akhir",
    "Jumadil Awal",
    "Jumadil Akhir",
    "Rajab",
    "Sya'ban",
    "Ramadhan",
    "Syawal",
    "Dzulqa'dah",
    "Dzulhijjah",
];

const MONTH_NAMES: &[&str] = &[
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "?"
    }
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

/// `"Minggu, 18 Oktober 2026 M"`
pub fn masehi_string(date: NaiveDate) -> String {
    format!(
        "{}, {} {} {} M",
        day_name(date.weekday()),
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    )
}

/// Hijri date for `date`, shifted by `offset_days` for local moon sighting.
pub fn hijri_string(date: NaiveDate, offset_days: i32) -> String {
    let adjusted = date + Duration::days(offset_days as i64);

    match HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    ) {
        Ok(hd) => format!("{} {} {} H", hd.day(), hijri_month_name(hd.month()), hd.year()),
        Err(e) => {
            log::debug!("Hijri conversion failed for {}: {}", adjusted, e);
            // Fallback: today without offset
            let hd = HijriDate::today();
            format!("{} {} {} H", hd.day(), hijri_month_name(hd.month()), hd.year())
        }
    }
}
