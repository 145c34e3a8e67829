use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::TrackFormat;

// @module: Subtitle timestamp formatting and parsing

// @const: H:MM:SS.cc or HH:MM:SS,mmm
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[.,](\d{2,3})$").unwrap()
});

/// Number of fractional units per second for a track format
pub fn units_per_second(format: TrackFormat) -> u64 {
    match format {
        TrackFormat::Ass => 100,
        TrackFormat::Srt => 1000,
    }
}

/// Format seconds as a track timestamp.
///
/// Negative and non-finite inputs are clamped to zero. The fraction is
/// rounded to the format's resolution and the overflow carries into the
/// seconds, minutes and hours fields, so `59.996` renders as `0:01:00.00`
/// in ASS and not `0:00:59.100`.
pub fn format_timestamp(seconds: f64, format: TrackFormat) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let per_second = units_per_second(format);
    let total_units = (seconds * per_second as f64).round() as u64;

    let fraction = total_units % per_second;
    let total_seconds = total_units / per_second;
    let secs = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    match format {
        TrackFormat::Ass => format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, fraction),
        TrackFormat::Srt => format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, fraction),
    }
}

/// Parse a timestamp in either track format back to seconds
pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
    let caps = TIMESTAMP_REGEX
        .captures(timestamp.trim())
        .ok_or_else(|| anyhow!("Invalid timestamp format: {}", timestamp))?;

    let hours: u64 = caps[1].parse().context("Failed to parse hours")?;
    let minutes: u64 = caps[2].parse().context("Failed to parse minutes")?;
    let seconds: u64 = caps[3].parse().context("Failed to parse seconds")?;
    let fraction_digits = &caps[4];
    let fraction: u64 = fraction_digits.parse().context("Failed to parse fraction")?;

    if minutes >= 60 || seconds >= 60 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    let divisor = 10u64.pow(fraction_digits.len() as u32) as f64;
    Ok((hours * 3600 + minutes * 60 + seconds) as f64 + fraction as f64 / divisor)
}
