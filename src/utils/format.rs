use unicode_width::UnicodeWidthChar;

/// Format a countdown as `H:MM:SS`, dropping the hour part when it is zero
/// (`12:05`, not `0:12:05`).
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format the iqomah countdown as `M:SS`; minutes are not padded.
pub fn format_iqomah(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Inverse of [`format_iqomah`].
pub fn parse_iqomah(text: &str) -> Option<i64> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes: i64 = minutes.parse().ok()?;
    let seconds: i64 = seconds.parse().ok()?;
    if !(0..60).contains(&seconds) || minutes < 0 {
        return None;
    }
    Some(minutes * 60 + seconds)
}

/// A `width`-column window into `text` repeated end to end, starting `offset`
/// characters in. Used for the scrolling footer.
pub fn marquee_window(text: &str, offset: usize, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    let mut i = offset % chars.len();
    // Zero-width characters never advance `used`, so bound the walk.
    for _ in 0..chars.len() * (width + 1) {
        if used >= width {
            break;
        }
        let c = chars[i];
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
        i = (i + 1) % chars.len();
    }
    out
}
