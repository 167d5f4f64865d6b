//! Error types for handoff-engine operations.
//!
//! The schedule searches themselves never fail; these errors only surface at
//! the edges (time zone names, caller-supplied timestamps, configuration,
//! incomplete decision requests and ledger storage).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandoffError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing participant: {0}")]
    MissingParticipant(String),

    #[error("Ledger error: {0}")]
    Ledger(String),
}

pub type Result<T> = std::result::Result<T, HandoffError>;
