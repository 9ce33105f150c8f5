//! Job Tracker records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `Priority` select values of the Job Tracker database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobPriority {
    HighPrior,
    MidPrior,
    LowPrior,
}

impl JobPriority {
    /// Parse the exact select option name; anything else is "no priority".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "High Prior" => Some(JobPriority::HighPrior),
            "Mid Prior" => Some(JobPriority::MidPrior),
            "Low Prior" => Some(JobPriority::LowPrior),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::HighPrior => "High Prior",
            JobPriority::MidPrior => "Mid Prior",
            JobPriority::LowPrior => "Low Prior",
        }
    }

    #[must_use]
    pub fn badge(&self) -> &'static str {
        match self {
            JobPriority::HighPrior => "🔴 High",
            JobPriority::MidPrior => "🟡 Mid",
            JobPriority::LowPrior => "🟢 Low",
        }
    }
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the Job Tracker database. Read-only within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<JobPriority>,
    pub application_link: Option<String>,
}

impl Job {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            deadline: None,
            priority: None,
            application_link: None,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: JobPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}
