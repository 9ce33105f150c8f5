//! Error type for the continuity workflow.

use chrono::NaiveDate;
use notion::NotionError;
use thiserror::Error;

use crate::config::ValidationError;
use crate::domain::MapError;
use crate::draft::EditError;
use crate::ledger::LedgerError;

pub type Result<T> = std::result::Result<T, ContinuityError>;

#[derive(Debug, Error)]
pub enum ContinuityError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Notion request failed: {0}")]
    Notion(#[from] NotionError),

    #[error("unexpected record shape: {0}")]
    Mapping(#[from] MapError),

    #[error("edit rejected: {0}")]
    Edit(#[from] EditError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("cancelled by user")]
    UserCancelled,

    #[error("a page for {0} was already published")]
    AlreadyProcessed(NaiveDate),
}

impl ContinuityError {
    /// Actionable hint shown under the error message.
    #[must_use]
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some("Fix the value in your environment or .env file (see `continuity init-env`)"),
            Self::Notion(err) => err.remediation(),
            Self::Ledger(_) => Some("Repair or delete the state file, or pass --state to use another one"),
            Self::AlreadyProcessed(_) => Some("Pass --force to publish again for this date"),
            Self::Mapping(_) | Self::Edit(_) | Self::UserCancelled => None,
        }
    }
}
