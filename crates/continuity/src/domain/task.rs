//! Plan AI task records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category reserved for day-specific time blocks. Never carried over.
pub const SCHEDULE_CATEGORY: &str = "Schedule";

/// Label used when a task has no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// `Priority Level` select values of the Plan AI database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// All priorities, highest first.
    #[must_use]
    pub fn all() -> &'static [TaskPriority] {
        &[TaskPriority::High, TaskPriority::Medium, TaskPriority::Low]
    }

    /// Parse a select option name exactly as Notion stores it, so a parsed
    /// value always writes back to the same option. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == s.trim())
    }

    /// Select option name as stored in Notion.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }

    /// Colored badge shown in previews.
    #[must_use]
    pub fn badge(&self) -> &'static str {
        match self {
            TaskPriority::High => "🔴 High",
            TaskPriority::Medium => "🟡 Med",
            TaskPriority::Low => "🟢 Low",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the Plan AI database.
///
/// `id` is empty for tasks that have not been written to Notion yet
/// (carryover output and manual additions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub completed: bool,
    pub target_date: Option<NaiveDate>,
    pub priority_level: Option<TaskPriority>,
    pub category: String,
}

impl Task {
    /// A fresh, unsaved, uncompleted task.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        priority_level: Option<TaskPriority>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            completed: false,
            target_date: None,
            priority_level,
            category: category.into(),
        }
    }

    #[must_use]
    pub fn with_target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }

    /// Whether this task belongs to the reserved schedule category.
    #[must_use]
    pub fn is_schedule(&self) -> bool {
        self.category == SCHEDULE_CATEGORY
    }

    /// Category for grouping; empty categories group as "Uncategorized".
    #[must_use]
    pub fn group_name(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORIZED
        } else {
            &self.category
        }
    }

    /// Whether the task exists in Notion.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}
