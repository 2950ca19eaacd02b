use crate::normalize::{self, EventTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One event record as returned by the extraction service.
///
/// Nothing about the payload is guaranteed: any field may be absent,
/// null, empty, or arbitrary text. All screening of shape happens in
/// [`screen`]; the builders still parse field contents defensively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub title: Option<String>,
    /// Compact calendar date, expected as 8 digits (YYYYMMDD).
    #[serde(default)]
    pub date: Option<String>,
    /// Compact time of day, expected as 6 digits (HHMMSS).
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Reads an optional field as "present": non-absent and non-empty.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// Why screening rejected a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingTitle,
    MissingDate,
    MissingTime,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::MissingTitle => "title is missing",
            RejectReason::MissingDate => "date is missing",
            RejectReason::MissingTime => "time is missing",
        };
        f.write_str(text)
    }
}

/// Outcome of screening one record at the service boundary.
#[derive(Debug, Clone)]
pub enum Screened {
    Valid(ValidEvent),
    Rejected { event: RawEvent, reason: RejectReason },
}

/// A [`RawEvent`] whose title, date and time are all present and
/// non-empty. Presence is the whole guarantee: the contents are still
/// untrusted text and the builders parse them defensively.
#[derive(Debug, Clone)]
pub struct ValidEvent {
    raw: RawEvent,
}

impl ValidEvent {
    pub fn title(&self) -> &str {
        self.raw.title.as_deref().unwrap_or_default()
    }

    pub fn raw(&self) -> &RawEvent {
        &self.raw
    }

    /// One menu line: title, resolved start, and a description snippet.
    pub fn display(&self) -> String {
        let resolved = normalize::normalize(self.raw.date.as_deref(), self.raw.time.as_deref());
        let when = match resolved {
            EventTime::Timed(start) => start.format("%Y-%m-%d %H:%M UTC").to_string(),
            EventTime::AllDay(day) => format!("{} (all day)", day.format("%Y-%m-%d")),
            EventTime::Fallback(_) => "date unknown".to_string(),
        };
        let mut output = format!("{} - {}", self.title(), when);

        if let Some(description) = present(&self.raw.description) {
            let snippet: String = description.chars().take(80).collect();
            if snippet.len() < description.len() {
                output.push_str(&format!("\n   {}...", snippet));
            } else {
                output.push_str(&format!("\n   {}", snippet));
            }
        }

        output
    }
}

/// Screens one record: every record comes out as either `Valid` or
/// `Rejected` with the first missing field named. An empty string counts
/// as missing.
pub fn screen(event: RawEvent) -> Screened {
    let reason = if present(&event.title).is_none() {
        Some(RejectReason::MissingTitle)
    } else if present(&event.date).is_none() {
        Some(RejectReason::MissingDate)
    } else if present(&event.time).is_none() {
        Some(RejectReason::MissingTime)
    } else {
        None
    };

    match reason {
        Some(reason) => Screened::Rejected { event, reason },
        None => Screened::Valid(ValidEvent { raw: event }),
    }
}
