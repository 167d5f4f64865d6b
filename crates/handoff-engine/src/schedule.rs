//! Weekly operating-hours model.
//!
//! A [`WeeklySchedule`] maps each [`Day`] to a [`DaySchedule`]. Profiles are
//! loosely typed JSON, so decoding is lenient: unknown keys are ignored, a
//! missing day is unavailable, and wrongly-typed fields fall back to
//! "unavailable" / blank rather than rejecting the whole schedule.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HandoffError;
use crate::time_of_day::TimeOfDay;

// ── Day ─────────────────────────────────────────────────────────────────────

/// Day of the week, ordered as a week starting on Sunday (Sunday = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All seven days in week order.
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Position in the week, Sunday = 0 through Saturday = 6.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The day at `index` modulo 7.
    pub fn from_index(index: usize) -> Day {
        Day::ALL[index % 7]
    }

    /// The day `n` days after this one, wrapping around the week.
    ///
    /// ```
    /// use handoff_engine::schedule::Day;
    ///
    /// assert_eq!(Day::Friday.next(3), Day::Monday);
    /// assert_eq!(Day::Sunday.next(7), Day::Sunday);
    /// ```
    pub fn next(self, n: usize) -> Day {
        Day::from_index(self.index() + n % 7)
    }

    /// Lower-case English name, as used for profile keys.
    pub fn name(self) -> &'static str {
        match self {
            Day::Sunday => "sunday",
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
        }
    }

    /// Look a day up by its lower-case profile key.
    pub fn from_name(name: &str) -> Option<Day> {
        Day::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        Day::from_index(weekday.num_days_from_sunday() as usize)
    }
}

// ── DaySchedule ─────────────────────────────────────────────────────────────

/// One weekday's availability and its raw open/close strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub available: bool,
    pub open: String,
    pub close: String,
}

impl DaySchedule {
    /// An available day with both times set.
    pub fn open_between(open: &str, close: &str) -> Self {
        DaySchedule {
            available: true,
            open: open.to_string(),
            close: close.to_string(),
        }
    }

    /// An available day that only declares a closing time.
    pub fn closing_at(close: &str) -> Self {
        DaySchedule {
            available: true,
            close: close.to_string(),
            ..Default::default()
        }
    }

    /// An available day that only declares an opening time.
    pub fn opening_at(open: &str) -> Self {
        DaySchedule {
            available: true,
            open: open.to_string(),
            ..Default::default()
        }
    }

    /// A day marked unavailable.
    pub fn unavailable() -> Self {
        DaySchedule::default()
    }

    /// Parsed opening time, if this day is usable for the opening search.
    pub fn opening(&self) -> Option<TimeOfDay> {
        usable_time(self.available, &self.open)
    }

    /// Parsed closing time, if this day is usable for the closing search.
    pub fn closing(&self) -> Option<TimeOfDay> {
        usable_time(self.available, &self.close)
    }

    fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        DaySchedule {
            available: value
                .get("available")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            open: text("open"),
            close: text("close"),
        }
    }
}

fn usable_time(available: bool, raw: &str) -> Option<TimeOfDay> {
    if !available || raw.trim().is_empty() {
        return None;
    }
    Some(TimeOfDay::parse(raw))
}

// ── WeeklySchedule ──────────────────────────────────────────────────────────

/// Recurring weekly operating hours keyed by [`Day`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "BTreeMap<Day, DaySchedule>")]
pub struct WeeklySchedule {
    days: BTreeMap<Day, DaySchedule>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_day(mut self, day: Day, schedule: DaySchedule) -> Self {
        self.insert(day, schedule);
        self
    }

    pub fn insert(&mut self, day: Day, schedule: DaySchedule) {
        self.days.insert(day, schedule);
    }

    pub fn get(&self, day: Day) -> Option<&DaySchedule> {
        self.days.get(&day)
    }

    /// Closing time for `day`, if that day is usable for the closing search.
    pub fn closing_time(&self, day: Day) -> Option<TimeOfDay> {
        self.get(day).and_then(DaySchedule::closing)
    }

    /// Opening time for `day`, if that day is usable for the opening search.
    pub fn opening_time(&self, day: Day) -> Option<TimeOfDay> {
        self.get(day).and_then(DaySchedule::opening)
    }

    /// Decode a schedule leniently from a JSON value.
    ///
    /// Anything other than an object yields an empty (never-open) schedule.
    pub fn from_value(value: &Value) -> Self {
        let days = value
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(key, v)| {
                        Day::from_name(key).map(|day| (day, DaySchedule::from_value(v)))
                    })
                    .collect()
            })
            .unwrap_or_default();
        WeeklySchedule { days }
    }

    /// Extract the `operatingHours` entry from a profile record.
    ///
    /// A value without an `operatingHours` key is treated as the schedule
    /// itself. Returns `None` when the profile explicitly carries no hours.
    pub fn from_profile(profile: &Value) -> Option<Self> {
        match profile.get("operatingHours") {
            Some(Value::Null) => None,
            Some(hours) => Some(Self::from_value(hours)),
            None if profile.is_object() => Some(Self::from_value(profile)),
            None => None,
        }
    }

    /// Parse a JSON document holding either a schedule or a profile record.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::InvalidSchedule`] only when `json` is not JSON.
    pub fn from_json_str(json: &str) -> Result<Option<Self>, HandoffError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| HandoffError::InvalidSchedule(format!("not valid JSON: {e}")))?;
        Ok(Self::from_profile(&value))
    }
}

impl From<Value> for WeeklySchedule {
    fn from(value: Value) -> Self {
        WeeklySchedule::from_value(&value)
    }
}

impl From<WeeklySchedule> for BTreeMap<Day, DaySchedule> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule.days
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
