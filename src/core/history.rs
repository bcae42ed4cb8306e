//! Mood history rows and timestamp formatting.
//!
//! Entries are rendered in the order the backend delivered them.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::api::MoodHistoryEntry;
use crate::core::mood::{MoodClass, descriptor};

pub const EMPTY_HISTORY_MESSAGE: &str = "No mood history yet. Take your first assessment!";

/// `Jan 15, 2024, 10:30 AM`
const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

const CLOCK_FORMAT: &str = "%H:%M";

/// Naive layouts the backend uses (SQLite `CURRENT_TIMESTAMP`, Python isoformat).
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub icon: &'static str,
    /// Backend label, verbatim.
    pub mood: String,
    pub date: String,
    pub class: MoodClass,
}

impl HistoryRow {
    pub fn from_entry(entry: &MoodHistoryEntry) -> Self {
        let d = descriptor(&entry.mood);
        Self {
            icon: d.icon,
            mood: entry.mood.clone(),
            date: format_timestamp(&entry.created_at),
            class: d.class,
        }
    }
}

pub fn rows(entries: &[MoodHistoryEntry]) -> Vec<HistoryRow> {
    entries.iter().map(HistoryRow::from_entry).collect()
}

/// Formats a backend timestamp in the local timezone.
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

/// Formats `raw` for display.
///
/// Stamps with an offset are converted to `tz`. Naive stamps carry no zone
/// and are shown as wall-clock time. Anything unparseable is returned as is.
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    parse_wall_clock(raw, tz)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `HH:MM` in the local timezone, for message stamps.
pub fn format_clock(raw: &str) -> Option<String> {
    format_clock_in(raw, &Local)
}

/// `HH:MM` of `raw`, or `None` when it does not parse.
pub fn format_clock_in<Tz>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    parse_wall_clock(raw, tz).map(|dt| dt.format(CLOCK_FORMAT).to_string())
}

fn parse_wall_clock<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(tz).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn entry(mood: &str, created_at: &str) -> MoodHistoryEntry {
        MoodHistoryEntry {
            id: None,
            mood: mood.to_string(),
            created_at: created_at.to_string(),
            answers: None,
        }
    }

    #[test]
    fn test_naive_timestamp_is_wall_clock() {
        assert_eq!(
            format_timestamp_in("2024-01-15 10:30:00", &Utc),
            "Jan 15, 2024, 10:30 AM"
        );
        assert_eq!(
            format_timestamp_in("2024-01-15T22:05:09.123456", &Utc),
            "Jan 15, 2024, 10:05 PM"
        );
    }

    #[test]
    fn test_offset_timestamp_converts_to_zone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_timestamp_in("2024-01-15T10:30:00Z", &plus_two),
            "Jan 15, 2024, 12:30 PM"
        );
        assert_eq!(
            format_timestamp_in("2024-03-01T00:15:00+01:00", &Utc),
            "Feb 29, 2024, 11:15 PM"
        );
    }

    #[test]
    fn test_unparseable_timestamp_is_raw() {
        assert_eq!(format_timestamp_in("yesterday", &Utc), "yesterday");
        assert_eq!(format_timestamp_in("", &Utc), "");
    }

    #[test]
    fn test_rows_keep_backend_order_and_label() {
        let entries = vec![
            entry("Stressed", "2024-01-16 08:00:00"),
            entry("Something new", "2024-01-15 10:30:00"),
            entry("Happy/Calm", "2024-01-17 09:00:00"),
        ];
        let rows = rows(&entries);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].mood, "Stressed");
        assert_eq!(rows[0].icon, "😰");
        assert_eq!(rows[1].mood, "Something new");
        assert_eq!(rows[1].class, MoodClass::Neutral);
        assert_eq!(rows[2].class, MoodClass::Happy);
    }

    #[test]
    fn test_clock_stamp() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_clock_in("2024-01-15T21:05:00Z", &plus_two).as_deref(),
            Some("23:05")
        );
        assert_eq!(
            format_clock_in("2024-01-15 08:30:00", &Utc).as_deref(),
            Some("08:30")
        );
        assert_eq!(format_clock_in("soon", &Utc), None);
    }

    #[test]
    fn test_rows_empty() {
        assert!(rows(&[]).is_empty());
    }
}
