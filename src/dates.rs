// 📅 Date Parser - sheet timestamps in local calendar time
//
// Google Sheets exports timestamps in two shapes:
// - "2024-03-15 14:30:00"  (form submissions, ISO-like with a space)
// - "15/03/2024 14:30"     (manual entries, day first)
// Anything else goes through a generic fallback. None is the invalid-date sentinel.

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use regex::Regex;
use std::sync::OnceLock;

/// Indonesian month abbreviations (id-ID short month names)
pub const ID_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

fn iso_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2}) (\d{1,2}):(\d{1,2}):(\d{1,2})")
            .expect("valid ISO datetime regex")
    })
}

fn day_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}) (\d{1,2}):(\d{1,2})")
            .expect("valid day-first datetime regex")
    })
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a sheet date. Returns None (the invalid sentinel) instead of failing.
///
/// Order:
/// 1. `YYYY-M-D H:M:S` prefix, local time, month 1-indexed
/// 2. `D/M/YYYY H:M` prefix, local time, day first
/// 3. generic fallback ([`parse_generic`])
pub fn parse_date_safe(input: &str) -> Option<DateTime<Local>> {
    if input.is_empty() {
        return None;
    }

    if let Some(caps) = iso_space_re().captures(input) {
        let n = |i: usize| caps[i].parse::<u32>().ok();
        return local_datetime(
            caps[1].parse::<i32>().ok()?,
            n(2)?,
            n(3)?,
            n(4)?,
            n(5)?,
            n(6)?,
        );
    }

    if let Some(caps) = day_first_re().captures(input) {
        let n = |i: usize| caps[i].parse::<u32>().ok();
        return local_datetime(caps[3].parse::<i32>().ok()?, n(2)?, n(1)?, n(4)?, n(5)?, 0);
    }

    parse_generic(input)
}

/// Build a local timestamp from calendar components.
///
/// Out-of-range components carry into the next unit the way a spreadsheet
/// date does: month 13 is January of the next year, Feb 30 is Mar 1 (or 2),
/// day 0 is the last day of the previous month, and 24:00:00 is the next
/// midnight. A wall-clock time skipped by a DST transition is invalid; a
/// repeated one resolves to the earlier instant.
pub fn local_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<DateTime<Local>> {
    // Month offset first (may be -1 for month 0), then day/time as plain offsets
    let month_index = i64::from(year) * 12 + i64::from(month) - 1;
    let first_year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let first_month = u32::try_from(month_index.rem_euclid(12)).ok()? + 1;

    let offset = Duration::days(i64::from(day) - 1)
        + Duration::hours(i64::from(hour))
        + Duration::minutes(i64::from(minute))
        + Duration::seconds(i64::from(second));

    let naive = NaiveDate::from_ymd_opt(first_year, first_month, 1)?
        .and_time(NaiveTime::MIN)
        .checked_add_signed(offset)?;

    Local.from_local_datetime(&naive).earliest()
}

/// Generic fallback for anything the two sheet shapes don't cover
///
/// - RFC 3339 / RFC 2822 (explicit offsets)
/// - "YYYY-MM-DD" date only → UTC midnight
/// - "YYYY-MM-DDTHH:MM[:SS]" → local time
/// - "YYYY/MM/DD", "MM/DD/YYYY" (month first), "15 Mar 2024", "Mar 15, 2024" → local midnight
pub fn parse_generic(input: &str) -> Option<DateTime<Local>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let utc = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        return Some(utc.with_timezone(&Local));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y/%m/%d %H:%M:%S", "%m/%d/%Y %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    for fmt in ["%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .earliest();
        }
    }

    None
}

// ============================================================================
// DISPLAY
// ============================================================================

/// id-ID display date with 2-digit day and short month: "05 Mar 2024", "17 Agu 2025"
pub fn format_display_date(date: &DateTime<Local>) -> String {
    let month = ID_MONTHS[date.month0() as usize];
    format!("{:02} {} {}", date.day(), month, date.year())
}

// ============================================================================
// TESTS
// ============================================================================
