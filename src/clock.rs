//! Wall-clock helpers that turn `"HH:MM"` job times into the minute integers
//! the billing engine consumes.

use crate::error::{Error, Result};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse `"H:MM"` or `"HH:MM"` into minutes since midnight.
///
/// ```rust
/// use fieldtrack::clock::parse_hhmm;
///
/// assert_eq!(parse_hhmm("07:30").unwrap(), 450);
/// assert!(parse_hhmm("24:00").is_err());
/// assert!(parse_hhmm("7.30").is_err());
/// ```
pub fn parse_hhmm(value: &str) -> Result<u32> {
    let invalid = || Error::InvalidTime(value.to_string());

    let (h, m) = value.trim().split_once(':').ok_or_else(invalid)?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(invalid());
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(Error::TimeOutOfRange { hour, minute });
    }

    Ok(hour * 60 + minute)
}

/// Minutes from `start` to `end`, both `"HH:MM"`.
///
/// An end before the start is taken to be on the next day.
pub fn span_minutes(start: &str, end: &str) -> Result<u32> {
    let start = parse_hhmm(start)?;
    let end = parse_hhmm(end)?;

    Ok((end + MINUTES_PER_DAY - start) % MINUTES_PER_DAY)
}

/// Sign-aware `"H:MM"` rendering of a minute count, e.g. `-90` → `"-1:30"`.
pub fn format_minutes_to_hours(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();
    format!("{}{}:{:02}", sign, abs / 60, abs % 60)
}
