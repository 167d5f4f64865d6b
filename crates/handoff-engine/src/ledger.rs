//! Accepted-task ledger.
//!
//! Accepting a match produces one [`AcceptedTask`] that must land in both the
//! donor's and the recipient's lists. [`Ledger::append_accepted`] does that as
//! a single step so concurrent acceptances for the same user cannot drop each
//! other's records. [`Ledger::commit_acceptance`] extends that step to the
//! decider's decision log. Records are never mutated or deleted here.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HandoffError, Result};

/// Default number of entries returned by [`Ledger::recent_tasks`].
pub const DEFAULT_RECENT_TASKS: usize = 3;

/// A finalized donor/recipient pairing with its handoff timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedTask {
    pub donor_id: String,
    pub donor_name: String,
    pub recipient_id: String,
    pub recipient_name: String,
    /// Formatted donor closing time, or `"Unavailable"`.
    pub donor_closing_time: String,
    /// Formatted recipient opening time, or `"Unavailable"`.
    pub recipient_open_time: String,
    /// When the task was created.
    pub timestamp: DateTime<Utc>,
}

/// One accept/decline decision made by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub recipient: String,
    pub donor: String,
    pub decision: bool,
    pub timestamp: DateTime<Utc>,
}

/// Per-user storage for accepted tasks and decisions.
pub trait Ledger: Send + Sync {
    /// Append `task` to the donor's and the recipient's lists atomically.
    ///
    /// Either both lists gain the record or neither does. When donor and
    /// recipient are the same user the record is stored once.
    fn append_accepted(&self, task: &AcceptedTask) -> Result<()>;

    /// All accepted tasks for `user_id`, in append order.
    fn accepted_tasks(&self, user_id: &str) -> Result<Vec<AcceptedTask>>;

    /// Append `task` to both participants and `decision` to `decided_by`'s
    /// log as one step. On error none of the three writes is visible.
    fn commit_acceptance(
        &self,
        task: &AcceptedTask,
        decided_by: &str,
        decision: DecisionRecord,
    ) -> Result<()>;

    /// Append a decision to `user_id`'s decision log.
    fn record_decision(&self, user_id: &str, decision: DecisionRecord) -> Result<()>;

    /// All decisions recorded for `user_id`, in append order.
    fn decisions(&self, user_id: &str) -> Result<Vec<DecisionRecord>>;

    /// The last `limit` accepted tasks for `user_id` ordered by creation time.
    fn recent_tasks(&self, user_id: &str, limit: usize) -> Result<Vec<AcceptedTask>> {
        let mut tasks = self.accepted_tasks(user_id)?;
        tasks.sort_by_key(|t| t.timestamp);
        let skip = tasks.len().saturating_sub(limit);
        Ok(tasks.split_off(skip))
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    accepted: HashMap<String, Vec<AcceptedTask>>,
    decisions: HashMap<String, Vec<DecisionRecord>>,
}

/// [`Ledger`] held in process memory behind a single lock.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>> {
        self.state
            .lock()
            .map_err(|_| HandoffError::Ledger("ledger lock poisoned".to_string()))
    }
}

impl LedgerState {
    fn push_accepted(&mut self, task: &AcceptedTask) {
        self.accepted
            .entry(task.donor_id.clone())
            .or_default()
            .push(task.clone());
        if task.recipient_id != task.donor_id {
            self.accepted
                .entry(task.recipient_id.clone())
                .or_default()
                .push(task.clone());
        }
    }

    fn push_decision(&mut self, user_id: &str, decision: DecisionRecord) {
        self.decisions
            .entry(user_id.to_string())
            .or_default()
            .push(decision);
    }
}

impl Ledger for InMemoryLedger {
    fn append_accepted(&self, task: &AcceptedTask) -> Result<()> {
        self.lock()?.push_accepted(task);
        Ok(())
    }

    fn commit_acceptance(
        &self,
        task: &AcceptedTask,
        decided_by: &str,
        decision: DecisionRecord,
    ) -> Result<()> {
        let mut state = self.lock()?;
        state.push_accepted(task);
        state.push_decision(decided_by, decision);
        Ok(())
    }

    fn accepted_tasks(&self, user_id: &str) -> Result<Vec<AcceptedTask>> {
        Ok(self
            .lock()?
            .accepted
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    fn record_decision(&self, user_id: &str, decision: DecisionRecord) -> Result<()> {
        self.lock()?.push_decision(user_id, decision);
        Ok(())
    }

    fn decisions(&self, user_id: &str) -> Result<Vec<DecisionRecord>> {
        Ok(self
            .lock()?
            .decisions
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
