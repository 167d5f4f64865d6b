//! # handoff-engine
//!
//! Deterministic handoff timing for food-donation matches.
//!
//! Given a donor's and a recipient's recurring weekly operating hours, the
//! engine finds the donor's next closing instant and the recipient's next
//! opening at or after it. All computation takes an explicit reference
//! instant, never the system clock, so results are reproducible.
//!
//! ## Modules
//!
//! - [`time_of_day`] — `"H:MM AM|PM"` → 24-hour time, degrading to midnight
//! - [`schedule`] — `Day`, `DaySchedule`, `WeeklySchedule` and lenient profile decoding
//! - [`search`] — next closing / next opening searches over a 7-day horizon
//! - [`window`] — combine both searches into a `MatchWindow`
//! - [`format`] — display rendering with the `"Unavailable"` sentinel
//! - [`ledger`] — accepted-task and decision records with atomic dual append
//! - [`decision`] — accept/decline workflow over a ledger
//! - [`config`] — time zone and view settings
//! - [`error`] — Error types

pub mod config;
pub mod decision;
pub mod error;
pub mod format;
pub mod ledger;
pub mod schedule;
pub mod search;
pub mod time_of_day;
pub mod window;

pub use config::{parse_rfc3339, parse_timezone, EngineConfig};
pub use decision::{Coordinator, DecisionOutcome, DecisionRequest, Profile};
pub use error::HandoffError;
pub use format::{
    format_window, render_instant, FormattedWindow, InstantFormatter, Rfc3339Formatter,
    UsLocaleFormatter, UNAVAILABLE,
};
pub use ledger::{AcceptedTask, DecisionRecord, InMemoryLedger, Ledger};
pub use schedule::{Day, DaySchedule, WeeklySchedule};
pub use search::{next_closing, next_opening, SEARCH_HORIZON_DAYS};
pub use time_of_day::{parse_time_of_day, TimeOfDay};
pub use window::{resolve_match_window, MatchWindow};
