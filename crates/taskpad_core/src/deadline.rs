//! Free-form deadline parsing.
//!
//! # Invariants
//! - Input without an explicit offset is interpreted as UTC.
//! - A bare date resolves to midnight of that day.
//! - Stored deadlines use RFC 3339 UTC with second precision, so their
//!   text order equals their instant order.

use chrono::{
    DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^in\s+(\d{1,6})\s+(minute|min|hour|day|week)s?$").expect("valid relative regex")
});
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(today|tomorrow|yesterday)(?:\s+(?:at\s+)?(\d{1,2}:\d{2}))?$")
        .expect("valid keyword regex")
});

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%B %d %Y %H:%M",
    "%d %B %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Deadline text that matched no supported form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparseableDate(pub String);

impl Display for UnparseableDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not parse date `{}`", self.0)
    }
}

impl Error for UnparseableDate {}

/// Parses free-form deadline text relative to `now`.
///
/// Accepted forms:
/// - RFC 3339 / ISO-8601 with offset (`2025-09-12T18:00:00+02:00`, `...Z`).
/// - Date with time, no offset (`2025-09-12 18:00`), read as UTC.
/// - Bare dates (`2025-09-12`, `2025/09/12`, `12.09.2025`, `Sep 12 2025`,
///   `12 September 2025`), read as midnight UTC.
/// - `now`, `today`, `tomorrow`, `yesterday`, optionally `[at] HH:MM`.
/// - `in N minutes|hours|days|weeks`.
pub fn parse_deadline(text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, UnparseableDate> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(UnparseableDate(text.to_string()));
    }

    parse_absolute(&normalized)
        .or_else(|| parse_relative(&normalized.to_ascii_lowercase(), now))
        .ok_or_else(|| UnparseableDate(text.trim().to_string()))
}

/// Storage/display form of a deadline.
pub fn format_deadline(deadline: DateTime<Utc>) -> String {
    deadline.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    let naive = text.strip_suffix('Z').unwrap_or(text);
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, format) {
            return Some(midnight(date));
        }
    }
    None
}

fn parse_relative(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if text == "now" {
        return Some(now);
    }

    if let Some(caps) = KEYWORD_RE.captures(text) {
        let today = now.date_naive();
        let date = match &caps[1] {
            "today" => today,
            "tomorrow" => today.succ_opt()?,
            _ => today.pred_opt()?,
        };
        let time = match caps.get(2) {
            Some(value) => NaiveTime::parse_from_str(value.as_str(), "%H:%M").ok()?,
            None => NaiveTime::MIN,
        };
        return Some(Utc.from_utc_datetime(&date.and_time(time)));
    }

    if let Some(caps) = RELATIVE_RE.captures(text) {
        let amount: i64 = caps[1].parse().ok()?;
        let offset = match &caps[2] {
            "minute" | "min" => Duration::try_minutes(amount)?,
            "hour" => Duration::try_hours(amount)?,
            "day" => Duration::try_days(amount)?,
            _ => Duration::try_weeks(amount)?,
        };
        return now.checked_add_signed(offset);
    }

    None
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
