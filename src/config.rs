//! Engine configuration
//!
//! One flat TOML table. Every knob has a built-in default, so an empty
//! file (or no file at all) yields a working configuration; `validate`
//! catches values that would make the engine misbehave rather than
//! letting them surface as odd runtime behavior.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{DeweyError, DeweyResult};

/// Ceiling on the day-count knobs (one century). Keeps every due-date
/// and cutoff computation inside the representable calendar.
pub const MAX_DAY_SPAN: i64 = 36_500;

/// Tunable parameters of the circulation engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirculationConfig {
    /// Days a loan runs when no explicit due date is given
    #[serde(default = "default_loan_period_days")]
    pub loan_period_days: i64,

    /// Ceiling on simultaneously outstanding loans per borrower
    #[serde(default = "default_max_loans_per_borrower")]
    pub max_loans_per_borrower: u32,

    /// How many days before the due date reminders start
    #[serde(default = "default_reminder_window_days")]
    pub reminder_window_days: u32,

    /// Attempts per loan update before giving up on a version conflict
    #[serde(default = "default_update_retry_limit")]
    pub update_retry_limit: u32,

    /// Days of tracking history `cleanup` keeps by default
    #[serde(default = "default_tracking_retention_days")]
    pub tracking_retention_days: u32,

    /// Seconds between scheduler passes
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_loan_period_days() -> i64 {
    14
}

fn default_max_loans_per_borrower() -> u32 {
    5
}

fn default_reminder_window_days() -> u32 {
    3
}

fn default_update_retry_limit() -> u32 {
    3
}

fn default_tracking_retention_days() -> u32 {
    90
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self {
            loan_period_days: default_loan_period_days(),
            max_loans_per_borrower: default_max_loans_per_borrower(),
            reminder_window_days: default_reminder_window_days(),
            update_retry_limit: default_update_retry_limit(),
            tracking_retention_days: default_tracking_retention_days(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl CirculationConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> DeweyResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|err| DeweyError::validation("config", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        Ok(Self::from_toml_str(&content)?)
    }

    pub fn validate(&self) -> DeweyResult<()> {
        if self.loan_period_days < 1 {
            return Err(DeweyError::validation(
                "loan_period_days",
                "must be at least 1",
            ));
        }
        if self.loan_period_days > MAX_DAY_SPAN {
            return Err(DeweyError::validation(
                "loan_period_days",
                format!("must be at most {MAX_DAY_SPAN}"),
            ));
        }
        if self.max_loans_per_borrower < 1 {
            return Err(DeweyError::validation(
                "max_loans_per_borrower",
                "must be at least 1",
            ));
        }
        if i64::from(self.reminder_window_days) > MAX_DAY_SPAN {
            return Err(DeweyError::validation(
                "reminder_window_days",
                format!("must be at most {MAX_DAY_SPAN}"),
            ));
        }
        if self.update_retry_limit < 1 {
            return Err(DeweyError::validation(
                "update_retry_limit",
                "must be at least 1",
            ));
        }
        if self.tracking_retention_days < 1 {
            return Err(DeweyError::validation(
                "tracking_retention_days",
                "must be at least 1",
            ));
        }
        if i64::from(self.tracking_retention_days) > MAX_DAY_SPAN {
            return Err(DeweyError::validation(
                "tracking_retention_days",
                format!("must be at most {MAX_DAY_SPAN}"),
            ));
        }
        if self.sweep_interval_secs < 1 {
            return Err(DeweyError::validation(
                "sweep_interval_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
