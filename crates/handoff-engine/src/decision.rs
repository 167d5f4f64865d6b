//! Accept/decline workflow for proposed donor/recipient pairs.
//!
//! Declining only records the decision. Accepting resolves the match window,
//! renders it, and commits one [`AcceptedTask`] for both participants together
//! with the decision.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::{HandoffError, Result};
use crate::format::{format_window, InstantFormatter, UsLocaleFormatter};
use crate::ledger::{AcceptedTask, DecisionRecord, Ledger, DEFAULT_RECENT_TASKS};
use crate::schedule::WeeklySchedule;
use crate::window::{resolve_match_window, MatchWindow};

/// The parts of a user profile the workflow reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub operating_hours: Option<WeeklySchedule>,
}

impl Profile {
    /// Read `name` and `operatingHours` from a profile record's details.
    pub fn from_value(details: &Value) -> Self {
        Profile {
            name: details
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            operating_hours: details
                .get("operatingHours")
                .filter(|v| !v.is_null())
                .map(WeeklySchedule::from_value),
        }
    }
}

/// A decision on one proposed pair.
#[derive(Debug, Clone)]
pub struct DecisionRequest<'a> {
    /// The user making the decision; the decision is logged under this id.
    pub decided_by: &'a str,
    pub donor_id: &'a str,
    pub recipient_id: &'a str,
    pub donor: Option<&'a Profile>,
    pub recipient: Option<&'a Profile>,
    pub accept: bool,
}

/// What a decision produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub record: DecisionRecord,
    /// Present only for acceptances.
    pub accepted: Option<AcceptedTask>,
}

/// Applies decisions against a [`Ledger`].
pub struct Coordinator<L> {
    ledger: L,
    formatter: Box<dyn InstantFormatter + Send + Sync>,
    recent_task_limit: usize,
}

impl<L: Ledger> Coordinator<L> {
    /// A coordinator rendering times with [`UsLocaleFormatter`].
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            formatter: Box::new(UsLocaleFormatter),
            recent_task_limit: DEFAULT_RECENT_TASKS,
        }
    }

    /// A coordinator whose recent-task view follows `config`.
    pub fn from_config(ledger: L, config: &EngineConfig) -> Self {
        Self::new(ledger).with_recent_task_limit(config.recent_task_limit)
    }

    pub fn with_recent_task_limit(mut self, limit: usize) -> Self {
        self.recent_task_limit = limit;
        self
    }

    /// Replace the formatter used for stored handoff times.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: InstantFormatter + Send + Sync + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Resolve the window an acceptance at `now` would record, without
    /// touching the ledger.
    pub fn preview<Z: TimeZone>(
        &self,
        donor: &Profile,
        recipient: &Profile,
        now: &DateTime<Z>,
    ) -> MatchWindow<Z> {
        resolve_match_window(
            donor.operating_hours.as_ref(),
            recipient.operating_hours.as_ref(),
            now,
        )
    }

    /// Apply `request` at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::MissingParticipant`] when accepting without
    /// both profiles, and [`HandoffError::Ledger`] when the ledger rejects
    /// the write. Nothing is recorded in either case.
    pub fn decide<Z: TimeZone>(
        &self,
        request: &DecisionRequest<'_>,
        now: &DateTime<Z>,
    ) -> Result<DecisionOutcome> {
        let timestamp = now.with_timezone(&Utc);
        let record = DecisionRecord {
            recipient: request.recipient_id.to_string(),
            donor: request.donor_id.to_string(),
            decision: request.accept,
            timestamp,
        };

        if !request.accept {
            self.ledger
                .record_decision(request.decided_by, record.clone())?;
            tracing::info!(
                donor = request.donor_id,
                recipient = request.recipient_id,
                "match declined"
            );
            return Ok(DecisionOutcome {
                record,
                accepted: None,
            });
        }

        let (Some(donor), Some(recipient)) = (request.donor, request.recipient) else {
            tracing::warn!(
                donor = request.donor_id,
                recipient = request.recipient_id,
                "accept rejected: missing donor/recipient details"
            );
            return Err(HandoffError::MissingParticipant(
                "missing donor/recipient details".to_string(),
            ));
        };

        let window = self.preview(donor, recipient, now);
        let formatted = format_window(&window, self.formatter.as_ref());
        let task = AcceptedTask {
            donor_id: request.donor_id.to_string(),
            donor_name: donor.name.clone(),
            recipient_id: request.recipient_id.to_string(),
            recipient_name: recipient.name.clone(),
            donor_closing_time: formatted.donor_closing,
            recipient_open_time: formatted.recipient_opening,
            timestamp,
        };
        self.ledger
            .commit_acceptance(&task, request.decided_by, record.clone())?;
        tracing::info!(
            donor = request.donor_id,
            recipient = request.recipient_id,
            actionable = window.is_actionable(),
            "match accepted"
        );

        Ok(DecisionOutcome {
            record,
            accepted: Some(task),
        })
    }

    /// The user's most recent accepted tasks, oldest first, capped at the
    /// coordinator's recent-task limit.
    pub fn recent_tasks(&self, user_id: &str) -> Result<Vec<AcceptedTask>> {
        self.ledger.recent_tasks(user_id, self.recent_task_limit)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
