//! Pure unit/format converters shared by the card builder and the list view.

use chrono::{Local, TimeZone};

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Round a temperature (already in degrees Celsius) to the nearest whole
/// degree. Ties round away from zero, matching `f64::round`.
pub fn round_temp(celsius: f64) -> i64 {
    celsius.round() as i64
}

/// Map a wind bearing in degrees `[0, 360]` to one of the 8 compass points.
///
/// Each point owns a 45-degree sector; the bearing is rounded to the nearest
/// sector index (half-away-from-zero, so 22.5 lands on NE and 67.5 on E) and
/// wrapped, so 360 comes back around to N.
pub fn compass_direction(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round() as usize % 8;
    COMPASS_POINTS[index]
}

/// Format a Unix timestamp (seconds, UTC) as a local 12-hour clock time,
/// e.g. `7:05 AM`. Falls back to `--:--` for timestamps chrono cannot
/// represent; the output otherwise depends on the process timezone.
pub fn format_clock_time(unix_seconds: i64) -> String {
    match Local.timestamp_opt(unix_seconds, 0).single() {
        Some(dt) => dt.format("%-I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}
