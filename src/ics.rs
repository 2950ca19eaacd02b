//! iCalendar document generation.
//!
//! The output is deliberately minimal: one VCALENDAR wrapping one VEVENT
//! per event, with CRLF line endings. Timed events carry only a DTSTART;
//! the consuming calendar application applies its default duration.

use crate::event::{present, RawEvent};
use crate::normalize::{self, EventTime};
use chrono::Utc;
use log::debug;
use uuid::Uuid;

/// Product identifier stamped into every generated calendar.
const PRODID: &str = "-//eventscan//EN";

const CRLF: &str = "\r\n";

/// Renders a VCALENDAR document for the given events, in input order.
/// Returns `None` when there is nothing to export.
pub fn build_ics(events: &[RawEvent]) -> Option<String> {
    if events.is_empty() {
        return None;
    }

    let dtstamp = normalize::format_utc_stamp(normalize::utc_now_second());
    let mut lines: Vec<String> = Vec::with_capacity(events.len() * 8 + 4);
    lines.push("BEGIN:VCALENDAR".to_string());
    lines.push("VERSION:2.0".to_string());
    lines.push(format!("PRODID:{}", PRODID));

    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", new_uid()));
        lines.push(format!("DTSTAMP:{}", dtstamp));
        lines.push(format!("SUMMARY:{}", present(&event.title).unwrap_or("No Title")));

        match normalize::normalize(event.date.as_deref(), event.time.as_deref()) {
            EventTime::Timed(start) => {
                lines.push(format!("DTSTART:{}", normalize::format_utc_stamp(start)));
            }
            EventTime::AllDay(day) => {
                let end = day.succ_opt().unwrap_or(day);
                lines.push(format!(
                    "DTSTART;VALUE=DATE:{}",
                    normalize::format_compact_date(day)
                ));
                lines.push(format!(
                    "DTEND;VALUE=DATE:{}",
                    normalize::format_compact_date(end)
                ));
            }
            EventTime::Fallback(instant) => {
                lines.push(format!("DTSTART:{}", normalize::format_utc_stamp(instant)));
            }
        }

        let description = present(&event.description).unwrap_or("No Description");
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    debug!("Built ICS document with {} event(s)", events.len());

    let mut document = lines.join(CRLF);
    document.push_str(CRLF);
    Some(document)
}

/// Collision avoidance within one document is all this needs: wall-clock
/// millis plus a random token.
fn new_uid() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple())
}

/// Newline is the only character escaped; commas and semicolons pass
/// through unescaped.
fn escape_text(text: &str) -> String {
    text.replace("\r\n", "\\n").replace(['\r', '\n'], "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn event(title: &str, date: &str, time: Option<&str>, description: Option<&str>) -> RawEvent {
        RawEvent {
            title: Some(title.to_string()),
            date: Some(date.to_string()),
            time: time.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    fn line<'a>(document: &'a str, prefix: &str) -> &'a str {
        document
            .lines()
            .find(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("no line starting with {:?}", prefix))
    }

    #[test]
    fn empty_input_produces_no_document() {
        assert_eq!(build_ics(&[]), None);
    }

    #[test]
    fn two_events_render_in_input_order() {
        let events = vec![
            event("First", "20250101", Some("090000"), None),
            event("Second", "20250102", Some("100000"), None),
        ];
        let document = build_ics(&events).unwrap();

        assert_eq!(document.matches("BEGIN:VEVENT").count(), 2);
        assert_eq!(document.matches("END:VEVENT").count(), 2);
        let first = document.find("SUMMARY:First").unwrap();
        let second = document.find("SUMMARY:Second").unwrap();
        assert!(first < second);

        for line in document.lines() {
            if let Some(uid) = line.strip_prefix("UID:") {
                assert!(!uid.is_empty());
            }
            if let Some(stamp) = line.strip_prefix("DTSTAMP:") {
                assert_eq!(stamp.len(), 16);
                assert!(stamp.ends_with('Z'));
            }
        }
    }

    #[test]
    fn document_frame_is_present() {
        let document = build_ics(&[event("Solo", "20250101", Some("090000"), None)]).unwrap();
        assert!(document.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//eventscan//EN\r\n"));
        assert!(document.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn lines_are_crlf_terminated() {
        let document = build_ics(&[event("Solo", "20250101", None, None)]).unwrap();
        assert_eq!(
            document.matches("\r\n").count(),
            document.lines().count(),
            "every line should end with CRLF"
        );
    }

    #[test]
    fn timed_event_has_start_but_no_end() {
        let document = build_ics(&[event("Sync", "20250615", Some("140000"), None)]).unwrap();
        assert_eq!(line(&document, "DTSTART"), "DTSTART:20250615T140000Z");
        assert!(!document.contains("DTEND"));
    }

    #[test]
    fn all_day_event_spans_exactly_one_day() {
        let document = build_ics(&[event("Holiday", "20250101", None, None)]).unwrap();
        assert_eq!(line(&document, "DTSTART"), "DTSTART;VALUE=DATE:20250101");
        assert_eq!(line(&document, "DTEND"), "DTEND;VALUE=DATE:20250102");
    }

    #[test]
    fn all_day_end_crosses_month_boundary() {
        let document = build_ics(&[event("Review", "20250131", None, None)]).unwrap();
        assert_eq!(line(&document, "DTEND"), "DTEND;VALUE=DATE:20250201");
    }

    #[test]
    fn bad_time_renders_as_all_day() {
        let document = build_ics(&[event("Fuzzy", "20250615", Some("2pm"), None)]).unwrap();
        assert_eq!(line(&document, "DTSTART"), "DTSTART;VALUE=DATE:20250615");
        assert_eq!(line(&document, "DTEND"), "DTEND;VALUE=DATE:20250616");
    }

    #[test]
    fn unusable_date_renders_fallback_timestamp() {
        let document = build_ics(&[event("Mystery", "someday", Some("090000"), None)]).unwrap();
        let start = line(&document, "DTSTART");
        assert!(start.starts_with("DTSTART:"), "got {:?}", start);
        assert!(start.ends_with('Z'));
        assert!(!document.contains("VALUE=DATE"));
        assert!(!document.contains("DTEND"));
    }

    #[test]
    fn newline_in_description_is_escaped_onto_one_line() {
        let document = build_ics(&[event(
            "Notes",
            "20250101",
            Some("090000"),
            Some("line one\nline two"),
        )])
        .unwrap();
        assert_eq!(
            line(&document, "DESCRIPTION"),
            "DESCRIPTION:line one\\nline two"
        );
    }

    #[test]
    fn carriage_returns_collapse_into_the_same_escape() {
        let document = build_ics(&[event(
            "Notes",
            "20250101",
            Some("090000"),
            Some("a\r\nb\rc"),
        )])
        .unwrap();
        assert_eq!(line(&document, "DESCRIPTION"), "DESCRIPTION:a\\nb\\nc");
    }

    #[test]
    fn commas_and_semicolons_pass_through() {
        let document = build_ics(&[event(
            "Notes",
            "20250101",
            Some("090000"),
            Some("one, two; three"),
        )])
        .unwrap();
        assert_eq!(
            line(&document, "DESCRIPTION"),
            "DESCRIPTION:one, two; three"
        );
    }

    #[test]
    fn missing_title_and_description_use_placeholders() {
        let events = vec![RawEvent {
            title: Some(String::new()),
            date: Some("20250101".to_string()),
            time: Some("090000".to_string()),
            description: None,
        }];
        let document = build_ics(&events).unwrap();
        assert_eq!(line(&document, "SUMMARY"), "SUMMARY:No Title");
        assert_eq!(line(&document, "DESCRIPTION"), "DESCRIPTION:No Description");
    }

    #[test]
    fn uids_are_unique_within_a_document() {
        let events = vec![
            event("A", "20250101", Some("090000"), None),
            event("B", "20250102", Some("090000"), None),
            event("C", "20250103", Some("090000"), None),
        ];
        let document = build_ics(&events).unwrap();
        let uids: HashSet<&str> = document
            .lines()
            .filter_map(|l| l.strip_prefix("UID:"))
            .collect();
        assert_eq!(uids.len(), 3);
    }
}
