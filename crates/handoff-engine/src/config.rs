//! Engine configuration.
//!
//! Loaded from TOML with every field optional, then overridden from the
//! environment (`HANDOFF_TIMEZONE`, `HANDOFF_RECENT_TASKS`).

use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{HandoffError, Result};
use crate::ledger::DEFAULT_RECENT_TASKS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA time zone in which operating hours are interpreted.
    pub timezone: String,
    /// How many accepted tasks a "recent tasks" view shows.
    pub recent_task_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            recent_task_limit: DEFAULT_RECENT_TASKS,
        }
    }
}

impl EngineConfig {
    /// Load config from a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::Config`] if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HandoffError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Try to load from `path`; on any failure fall back to defaults with
    /// environment overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::info!("config not loaded ({e}), using defaults");
                let mut config = Self::default();
                config.apply_overrides(|key| std::env::var(key).ok());
                config
            }
        }
    }

    /// Parse config from TOML text without consulting the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| HandoffError::Config(format!("invalid TOML: {e}")))
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tz) = lookup("HANDOFF_TIMEZONE") {
            self.timezone = tz;
        }
        if let Some(limit) = lookup("HANDOFF_RECENT_TASKS") {
            match limit.parse() {
                Ok(n) => self.recent_task_limit = n,
                Err(_) => tracing::warn!(value = %limit, "ignoring invalid HANDOFF_RECENT_TASKS"),
            }
        }
    }

    /// The configured time zone.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::InvalidTimezone`] for an unknown IANA name.
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

/// Parse an IANA time zone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| HandoffError::InvalidTimezone(format!("'{name}'")))
}

/// Parse an RFC 3339 timestamp supplied as a reference instant.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HandoffError::InvalidDatetime(format!("'{s}': {e}")))
}

// ── Tests ───────────────────────────────────────────────────────────────────
