//! 12-hour clock parsing for operating-hours entries.
//!
//! Profile records store opening and closing times as strings like `"9:30 AM"`.
//! Unavailable days frequently carry blank or half-filled times, so parsing
//! never fails: anything that is not a well-formed `"H:MM AM|PM"` string
//! degrades to midnight.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

/// A parsed point within a day, on the 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct TimeOfDay {
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
}

impl TimeOfDay {
    /// 00:00, the fallback for absent or malformed input.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// Build a time of day, returning `None` when either component is out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(TimeOfDay { hour, minute })
    }

    /// Parse a 12-hour clock string such as `"1:15 PM"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use handoff_engine::time_of_day::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::parse("1:15 PM"), TimeOfDay { hour: 13, minute: 15 });
    /// assert_eq!(TimeOfDay::parse("12:00 AM"), TimeOfDay::MIDNIGHT);
    /// assert_eq!(TimeOfDay::parse("soon"), TimeOfDay::MIDNIGHT);
    /// ```
    pub fn parse(input: &str) -> Self {
        parse_twelve_hour(input).unwrap_or(Self::MIDNIGHT)
    }

    /// Convert to a chrono [`NaiveTime`] with zero seconds.
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse an optional time string; `None` and blank input yield midnight.
pub fn parse_time_of_day(input: Option<&str>) -> TimeOfDay {
    input.map(TimeOfDay::parse).unwrap_or(TimeOfDay::MIDNIGHT)
}

fn parse_twelve_hour(input: &str) -> Option<TimeOfDay> {
    let mut tokens = input.split_whitespace();
    let time = tokens.next()?;
    let meridiem = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let is_pm = match meridiem.to_ascii_uppercase().as_str() {
        "AM" => false,
        "PM" => true,
        _ => return None,
    };

    let mut fields = time.split(':');
    let hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = match fields.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if fields.next().is_some() {
        return None;
    }

    let hour = match (hour, is_pm) {
        (h, true) if h < 12 => h + 12,
        (12, false) => 0,
        (h, _) => h,
    };

    TimeOfDay::new(hour, minute)
}

// ── Tests ───────────────────────────────────────────────────────────────────
