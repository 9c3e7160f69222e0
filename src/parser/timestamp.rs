//! Tolerant timestamp normalization.
//!
//! Syslog producers emit anything from full RFC 3339 down to a bare
//! time-of-day fragment. Whatever arrives, the caller gets back a usable
//! instant; on total failure that instant is `now`.

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Convert a textual timestamp into an absolute instant.
///
/// Tries, in order: RFC 3339 (fractional seconds and `Z`/offset accepted),
/// the BSD `Mon dd HH:MM:SS` shape with the current year substituted (the
/// format carries no year field), and bare `HH:MM:SS` fragments with the
/// current date substituted. Anything else yields `now`.
pub fn normalize(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let text = text.trim();
    if text.is_empty() {
        return now;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return dt.with_timezone(&Utc);
    }

    let with_year = format!("{} {}", now.year(), text);
    if let Ok(ndt) = NaiveDateTime::parse_from_str(&with_year, "%Y %b %e %H:%M:%S") {
        return Utc.from_utc_datetime(&ndt);
    }

    // Truncated "H: MM:SS" fragments show up in the wild; squeeze the stray
    // space out before trying a plain time-of-day parse.
    let compact = text.replace(": ", ":");
    if let Ok(t) = NaiveTime::parse_from_str(&compact, "%H:%M:%S") {
        return Utc.from_utc_datetime(&now.date_naive().and_time(t));
    }

    now
}
