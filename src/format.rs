use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, TimeZone};

const POWER_LABELS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];

/// Human-readable file size using 1024-based steps, rounded to two decimals.
///
/// `1023` stays `1023 bytes`, `1024` becomes `1.0 KB`; anything past the
/// terabyte range is still expressed in TB.
pub fn format_bytes(size: u64) -> String {
  if size < 1024 {
    return format!("{} {}", size, POWER_LABELS[0]);
  }
  let mut scaled = size as f64;
  let mut power = 0;
  while scaled >= 1024.0 && power < POWER_LABELS.len() - 1 {
    scaled /= 1024.0;
    power += 1;
  }
  let rounded = (scaled * 100.0).round() / 100.0;
  format!("{:?} {}", rounded, POWER_LABELS[power])
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(raw.trim())
    .or_else(|_| DateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S%z"))
    .ok()
}

/// Renders a timestamp in `zone`, either in full or as a calendar date.
pub fn format_in_zone<Tz>(timestamp: &DateTime<FixedOffset>, zone: &Tz, short_date: bool) -> String
where
  Tz: TimeZone,
  Tz::Offset: Display,
{
  let converted = timestamp.with_timezone(zone);
  if short_date {
    converted.format("%Y-%m-%d").to_string()
  } else {
    converted.format("%Y-%m-%d %H:%M:%S%:z").to_string()
  }
}

pub fn format_local(timestamp: &DateTime<FixedOffset>, short_date: bool) -> String {
  format_in_zone(timestamp, &Local, short_date)
}

/// Converts a raw API timestamp to local time, keeping the raw text when it
/// does not parse.
pub fn convert_to_local_tz(raw: &str, short_date: bool) -> String {
  match parse_timestamp(raw) {
    Some(timestamp) => format_local(&timestamp, short_date),
    None => raw.to_string(),
  }
}
