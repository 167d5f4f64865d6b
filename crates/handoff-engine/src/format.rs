//! Presentation of resolved instants.
//!
//! Searches return raw instants; this module turns them into strings for
//! display and for the accepted-task records. An unresolved instant always
//! renders as [`UNAVAILABLE`], never as an empty string.

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use serde::Serialize;

use crate::window::MatchWindow;

/// Rendering used for an instant the searches could not resolve.
pub const UNAVAILABLE: &str = "Unavailable";

/// Renders a resolved instant as text.
pub trait InstantFormatter {
    fn format_instant(&self, instant: &DateTime<FixedOffset>) -> String;
}

/// US-style `M/D/YYYY, HH:MM AM|PM` in the instant's own offset,
/// e.g. `"5/4/2025, 07:00 PM"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsLocaleFormatter;

impl InstantFormatter for UsLocaleFormatter {
    fn format_instant(&self, instant: &DateTime<FixedOffset>) -> String {
        instant.format("%-m/%-d/%Y, %I:%M %p").to_string()
    }
}

/// RFC 3339 with second precision, e.g. `"2025-05-04T19:00:00-04:00"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc3339Formatter;

impl InstantFormatter for Rfc3339Formatter {
    fn format_instant(&self, instant: &DateTime<FixedOffset>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

/// Render an optional instant, using [`UNAVAILABLE`] for `None`.
pub fn render_instant<Z: TimeZone>(
    formatter: &dyn InstantFormatter,
    instant: Option<&DateTime<Z>>,
) -> String {
    match instant {
        Some(dt) => formatter.format_instant(&dt.fixed_offset()),
        None => UNAVAILABLE.to_string(),
    }
}

/// Display strings for both sides of a [`MatchWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedWindow {
    pub donor_closing: String,
    pub recipient_opening: String,
}

/// Render both sides of `window` with `formatter`.
pub fn format_window<Z: TimeZone>(
    window: &MatchWindow<Z>,
    formatter: &dyn InstantFormatter,
) -> FormattedWindow {
    FormattedWindow {
        donor_closing: render_instant(formatter, window.donor_closing.as_ref()),
        recipient_opening: render_instant(formatter, window.recipient_opening.as_ref()),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
