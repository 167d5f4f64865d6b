//! Match window resolution for a proposed donor/recipient pairing.
//!
//! The resolver only produces instants. Rendering them for display or storage
//! lives in [`crate::format`].

use chrono::{DateTime, Duration, TimeZone};

use crate::schedule::WeeklySchedule;
use crate::search::{next_closing, next_opening};

/// Donor closing and recipient opening for one pairing.
///
/// `None` on either side means no usable window within the search horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchWindow<Z: TimeZone> {
    pub donor_closing: Option<DateTime<Z>>,
    pub recipient_opening: Option<DateTime<Z>>,
}

impl<Z: TimeZone> MatchWindow<Z> {
    /// True when both sides resolved, so a handoff can actually be scheduled.
    pub fn is_actionable(&self) -> bool {
        self.donor_closing.is_some() && self.recipient_opening.is_some()
    }

    /// Time between the donor closing and the recipient opening.
    pub fn handoff_gap(&self) -> Option<Duration> {
        match (&self.donor_closing, &self.recipient_opening) {
            (Some(closing), Some(opening)) => Some(opening.clone() - closing.clone()),
            _ => None,
        }
    }
}

/// Resolve the handoff window for a donor and a recipient at `now`.
///
/// The donor's next closing becomes the anchor for the recipient's next
/// opening. Without a donor closing there is no anchor, so the recipient side
/// is unavailable as well. Never fails: absent schedules resolve to `None`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use handoff_engine::schedule::{Day, DaySchedule, WeeklySchedule};
/// use handoff_engine::window::resolve_match_window;
///
/// let donor = WeeklySchedule::new().with_day(Day::Monday, DaySchedule::closing_at("6:00 PM"));
/// let recipient = WeeklySchedule::new().with_day(Day::Tuesday, DaySchedule::opening_at("9:00 AM"));
/// let now = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
///
/// let window = resolve_match_window(Some(&donor), Some(&recipient), &now);
/// assert!(window.is_actionable());
/// assert_eq!(window.handoff_gap().unwrap().num_hours(), 15);
/// ```
pub fn resolve_match_window<Z: TimeZone>(
    donor: Option<&WeeklySchedule>,
    recipient: Option<&WeeklySchedule>,
    now: &DateTime<Z>,
) -> MatchWindow<Z> {
    let donor_closing = next_closing(donor, now);
    let recipient_opening = donor_closing
        .as_ref()
        .and_then(|closing| next_opening(recipient, closing, now));

    if donor_closing.is_some() && recipient_opening.is_none() {
        tracing::debug!("recipient has no opening within horizon after donor closing");
    }

    MatchWindow {
        donor_closing,
        recipient_opening,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
