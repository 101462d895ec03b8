//! Human-readable value formatting shared by the text and terminal outputs.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format bytes to a two-decimal size in powers of 1024, e.g. "1.50 KB".
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Inverse of [`format_bytes`]: "1.00 KB" -> 1024.0.
///
/// Returns `None` for a missing or unknown unit or a non-numeric value.
pub fn parse_bytes(text: &str) -> Option<f64> {
    let (value, unit) = text.trim().split_once(' ')?;
    let value: f64 = value.parse().ok()?;
    let power = UNITS.iter().position(|u| *u == unit.trim())?;
    Some(value * 1024f64.powi(power as i32))
}

/// Format a bytes-per-second rate, e.g. "2.00 KB/s".
pub fn format_bytes_rate(rate: f64) -> String {
    format!("{}/s", format_bytes(rate.max(0.0) as u64))
}

/// Format a percentage with one decimal.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format CPU ticks to human-readable time.
pub fn format_ticks(ticks: u64) -> String {
    let secs = ticks / 100;
    let centis = ticks % 100;
    if secs >= 3600 {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}.{:02}s", secs, centis)
    }
}
