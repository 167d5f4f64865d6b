//! Closing-time and opening-time searches over a [`WeeklySchedule`].
//!
//! Both searches walk at most [`SEARCH_HORIZON_DAYS`] days forward in cyclic
//! week order and stop at the first usable day whose candidate instant is
//! strictly after the threshold. At most one candidate exists per day, so the
//! first hit is also the earliest; the early exit is kept rather than
//! collecting and sorting candidates.
//!
//! The reference instant ("now") is always passed in. Nothing here reads the
//! system clock.

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDateTime, TimeZone};

use crate::schedule::{Day, WeeklySchedule};
use crate::time_of_day::TimeOfDay;

/// Number of consecutive days examined by either search.
pub const SEARCH_HORIZON_DAYS: usize = 7;

/// Find the earliest instant after `now` at which `schedule` closes.
///
/// Examines today and the following six days. A day counts only when it is
/// available and has a non-blank closing time; its candidate is that date at
/// the parsed closing time with seconds zeroed. Returns `None` for an absent
/// schedule or when no candidate within the horizon is strictly after `now`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use handoff_engine::schedule::{Day, DaySchedule, WeeklySchedule};
/// use handoff_engine::search::next_closing;
///
/// let donor = WeeklySchedule::new().with_day(Day::Monday, DaySchedule::closing_at("6:00 PM"));
/// // 2025-05-05 is a Monday.
/// let now = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
/// let closing = next_closing(Some(&donor), &now).unwrap();
/// assert_eq!(closing, Utc.with_ymd_and_hms(2025, 5, 5, 18, 0, 0).unwrap());
/// ```
pub fn next_closing<Z: TimeZone>(
    schedule: Option<&WeeklySchedule>,
    now: &DateTime<Z>,
) -> Option<DateTime<Z>> {
    let schedule = schedule?;
    let today = Day::from(now.weekday());

    first_candidate_after(now, today, |day| schedule.closing_time(day), "closing")
}

/// Find the earliest instant at which `schedule` opens after `anchor`.
///
/// If `anchor` is not strictly after `now`, the search base moves one day
/// later with the same wall-clock time. The week walk starts on the base's
/// weekday, and a candidate qualifies when it is strictly after the base.
///
/// The threshold is the base rather than the raw anchor. The two only differ
/// when the anchor has already passed, and in that case comparing against
/// the anchor would admit opening times that lie before `now`.
///
/// Returns `None` for an absent schedule or when nothing qualifies within
/// the horizon.
pub fn next_opening<Z: TimeZone>(
    schedule: Option<&WeeklySchedule>,
    anchor: &DateTime<Z>,
    now: &DateTime<Z>,
) -> Option<DateTime<Z>> {
    let schedule = schedule?;
    let base = opening_search_base(anchor, now)?;
    let start = Day::from(base.weekday());

    first_candidate_after(&base, start, |day| schedule.opening_time(day), "opening")
}

/// The threshold used by [`next_opening`] for a given anchor.
pub fn opening_search_base<Z: TimeZone>(
    anchor: &DateTime<Z>,
    now: &DateTime<Z>,
) -> Option<DateTime<Z>> {
    if anchor > now {
        Some(anchor.clone())
    } else {
        shift_days(anchor, 1)
    }
}

fn first_candidate_after<Z, F>(
    threshold: &DateTime<Z>,
    start: Day,
    time_for: F,
    kind: &str,
) -> Option<DateTime<Z>>
where
    Z: TimeZone,
    F: Fn(Day) -> Option<TimeOfDay>,
{
    for offset in 0..SEARCH_HORIZON_DAYS {
        let day = start.next(offset);
        let Some(time) = time_for(day) else {
            tracing::debug!(day = day.name(), offset, kind, "day not usable");
            continue;
        };
        let Some(candidate) = at_local_time(threshold, offset as u64, time) else {
            continue;
        };
        if candidate > *threshold {
            tracing::debug!(day = day.name(), offset, kind, %time, "candidate selected");
            return Some(candidate);
        }
        tracing::debug!(day = day.name(), offset, kind, %time, "candidate not after threshold");
    }
    tracing::debug!(kind, "no usable day within horizon");
    None
}

/// The local date of `base` plus `days_ahead`, at `time`.
fn at_local_time<Z: TimeZone>(
    base: &DateTime<Z>,
    days_ahead: u64,
    time: TimeOfDay,
) -> Option<DateTime<Z>> {
    let date = base.date_naive().checked_add_days(Days::new(days_ahead))?;
    resolve_local(&base.timezone(), date.and_time(time.to_naive_time()))
}

/// Same wall-clock time, `days` calendar days later.
fn shift_days<Z: TimeZone>(dt: &DateTime<Z>, days: u64) -> Option<DateTime<Z>> {
    let naive = dt.naive_local().checked_add_days(Days::new(days))?;
    resolve_local(&dt.timezone(), naive)
}

/// Map a wall-clock time to an instant.
///
/// Ambiguous times (clocks falling back) take the earlier instant. Times
/// inside a spring-forward gap move one hour later.
fn resolve_local<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> Option<DateTime<Z>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
