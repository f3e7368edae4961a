// Parsing of user-supplied date strings and weekday names.
//
// Everything relative ("today", "3d", "next friday") is resolved against an
// explicit `today` so results never depend on the wall clock.
use crate::error::{ScheduleError, ScheduleResult};
use chrono::{Datelike, Days, NaiveDate, TimeDelta};

/// Parses a calendar date: ISO `YYYY-MM-DD`, `today`, `tomorrow`,
/// `yesterday`, offsets like `3d`/`-2d`/`2w`, or a weekday name meaning its
/// next occurrence after `today`.
pub fn parse_smart_date(val: &str, today: NaiveDate) -> ScheduleResult<NaiveDate> {
    let trimmed = val.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    let lower = trimmed.to_lowercase();
    let offset_days = match lower.as_str() {
        "today" => Some(0),
        "tomorrow" => Some(1),
        "yesterday" => Some(-1),
        _ => None,
    };
    if let Some(days) = offset_days {
        return shift(today, days, val);
    }
    if let Some(n) = lower.strip_suffix('d').and_then(|s| s.parse::<i64>().ok()) {
        return shift(today, n, val);
    }
    if let Some(n) = lower.strip_suffix('w').and_then(|s| s.parse::<i64>().ok()) {
        let days = n.checked_mul(7).ok_or_else(|| out_of_range(val))?;
        return shift(today, days, val);
    }
    let weekday_part = lower.strip_prefix("next ").unwrap_or(&lower);
    if let Some(num) = parse_weekday_code(weekday_part) {
        return next_weekday(today, num).ok_or_else(|| out_of_range(val));
    }
    Err(ScheduleError::InvalidArgument(format!(
        "unrecognized date '{}'",
        val
    )))
}

fn shift(today: NaiveDate, days: i64, val: &str) -> ScheduleResult<NaiveDate> {
    TimeDelta::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .ok_or_else(|| out_of_range(val))
}

fn out_of_range(val: &str) -> ScheduleError {
    ScheduleError::InvalidArgument(format!("date '{}' is out of range", val))
}

/// Maps weekday names and abbreviations to 0 = Sunday .. 6 = Saturday.
fn parse_weekday_code(s: &str) -> Option<u8> {
    match s.trim().to_lowercase().as_str() {
        "su" | "sun" | "sunday" => Some(0),
        "mo" | "mon" | "monday" => Some(1),
        "tu" | "tue" | "tuesday" => Some(2),
        "we" | "wed" | "wednesday" => Some(3),
        "th" | "thu" | "thursday" => Some(4),
        "fr" | "fri" | "friday" => Some(5),
        "sa" | "sat" | "saturday" => Some(6),
        _ => None,
    }
}

fn next_weekday(from: NaiveDate, target: u8) -> Option<NaiveDate> {
    let current = from.weekday().num_days_from_sunday() as u64;
    let mut ahead = (target as u64 + 7 - current) % 7;
    if ahead == 0 {
        ahead = 7;
    }
    from.checked_add_days(Days::new(ahead))
}
