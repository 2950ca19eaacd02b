//! Date normalization for extracted events.
//!
//! The extraction service reports dates as compact 8-digit strings
//! (`YYYYMMDD`) and times as compact 6-digit strings (`HHMMSS`). Neither
//! is trustworthy, so conversion never fails: a bad time degrades to an
//! all-day date, a bad date degrades to the current time.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use log::debug;

/// The one well-defined moment or range an event resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// Start timestamp in UTC; consumers that need an end assume one hour.
    Timed(DateTime<Utc>),
    /// Whole-day event; the exclusive end is the following calendar date.
    AllDay(NaiveDate),
    /// The date was unusable; current time stands in so the event stays
    /// exportable.
    Fallback(DateTime<Utc>),
}

/// Converts a compact date/time pair into an [`EventTime`].
///
/// Total over all inputs: missing or unparseable dates yield
/// `Fallback`, a good date with a missing or unparseable time yields
/// `AllDay`, and only a fully valid pair yields `Timed`.
pub fn normalize(date: Option<&str>, time: Option<&str>) -> EventTime {
    let day = match date.and_then(parse_compact_date) {
        Some(day) => day,
        None => {
            debug!("Unusable event date {:?}, falling back to current time", date);
            return EventTime::Fallback(utc_now_second());
        }
    };

    match time {
        Some(text) => match parse_compact_time(text) {
            Some(tod) => EventTime::Timed(day.and_time(tod).and_utc()),
            None => {
                debug!("Unusable event time {:?} on {}, degrading to all-day", text, day);
                EventTime::AllDay(day)
            }
        },
        None => EventTime::AllDay(day),
    }
}

/// Parses `YYYYMMDD` by fixed offsets. Anything that is not exactly
/// eight bytes of digits forming a real calendar date is `None`.
fn parse_compact_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 {
        return None;
    }
    let year = text.get(0..4)?.parse::<u32>().ok()?;
    let month = text.get(4..6)?.parse::<u32>().ok()?;
    let day = text.get(6..8)?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Parses `HHMMSS` by fixed offsets; out-of-range components are `None`.
fn parse_compact_time(text: &str) -> Option<NaiveTime> {
    if text.len() != 6 {
        return None;
    }
    let hour = text.get(0..2)?.parse::<u32>().ok()?;
    let minute = text.get(2..4)?.parse::<u32>().ok()?;
    let second = text.get(4..6)?.parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Current UTC time truncated to whole seconds.
pub fn utc_now_second() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Formats a timestamp in the compact UTC form both ICS and Google
/// Calendar use (`YYYYMMDDTHHMMSSZ`).
pub fn format_utc_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Formats a calendar date in compact form (`YYYYMMDD`).
pub fn format_compact_date(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}
