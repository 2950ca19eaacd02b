//! Google Calendar deep links.
//!
//! A link pre-fills the event-creation form for exactly one event; no
//! Google API calls and no authentication are involved.

use crate::event::{present, RawEvent};
use crate::normalize::{self, EventTime};
use chrono::Duration;
use url::Url;

/// Tag prefixed to exported titles so entries created through this tool
/// stay recognizable in the calendar.
pub const EVENT_TAG: &str = "[Bookmarklet-events] ";

const RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Builds the event-creation deep link for one event.
///
/// Returns `None` when title or date is missing or empty; time is
/// optional and degrades per the normalizer. The page URL is prepended
/// to the description so the entry keeps its provenance.
pub fn event_url(event: &RawEvent, page_url: &str) -> Option<String> {
    let title = present(&event.title)?;
    present(&event.date)?;

    let dates = match normalize::normalize(event.date.as_deref(), event.time.as_deref()) {
        EventTime::Timed(start) | EventTime::Fallback(start) => format!(
            "{}/{}",
            normalize::format_utc_stamp(start),
            normalize::format_utc_stamp(start + Duration::hours(1))
        ),
        EventTime::AllDay(day) => format!(
            "{}/{}",
            normalize::format_compact_date(day),
            normalize::format_compact_date(day.succ_opt().unwrap_or(day))
        ),
    };

    let text = format!("{}{}", EVENT_TAG, title);
    let details = format!(
        "{}\n\n{}",
        page_url,
        present(&event.description).unwrap_or_default()
    );

    let url = Url::parse_with_params(
        RENDER_URL,
        &[
            ("action", "TEMPLATE"),
            ("text", text.as_str()),
            ("dates", dates.as_str()),
            ("details", details.as_str()),
        ],
    )
    .ok()?;
    Some(url.to_string())
}
