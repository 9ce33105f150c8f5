//! Processed-date ledger.
//!
//! Records which target dates already got a published page so a second run
//! for the same date does not duplicate the carryover records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::error::ContinuityError;

/// Default ledger location, relative to the working directory.
pub const DEFAULT_STATE_PATH: &str = ".continuity/state.json";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What was published for one target date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub page_url: String,
    pub tasks_created: usize,
    pub failures: usize,
    pub published_at: DateTime<Utc>,
}

impl LedgerEntry {
    #[must_use]
    pub fn new(page_url: impl Into<String>, tasks_created: usize, failures: usize) -> Self {
        Self {
            page_url: page_url.into(),
            tasks_created,
            failures,
            published_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub entries: BTreeMap<NaiveDate, LedgerEntry>,
}

impl Ledger {
    /// Load the ledger, or an empty one when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let io_err = |source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        };
        let content = serde_json::to_string_pretty(self).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, content).map_err(io_err)
    }

    #[must_use]
    pub fn is_processed(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&LedgerEntry> {
        self.entries.get(&date)
    }

    /// Refuse a second publish for `target` unless `force` is set.
    ///
    /// # Errors
    /// [`ContinuityError::AlreadyProcessed`] when `target` is recorded and
    /// `force` is off.
    pub fn guard(&self, target: NaiveDate, force: bool) -> Result<(), ContinuityError> {
        match self.get(target) {
            None => Ok(()),
            Some(entry) if force => {
                warn!(%target, page_url = %entry.page_url, "Publishing again for a processed date");
                Ok(())
            }
            Some(_) => Err(ContinuityError::AlreadyProcessed(target)),
        }
    }

    /// Record a publish, replacing any earlier entry for the same date.
    pub fn record(&mut self, date: NaiveDate, entry: LedgerEntry) {
        self.entries.insert(date, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::load(&dir.path().join("absent.json")).unwrap();
        assert!(ledger.entries.is_empty());
        assert!(!ledger.is_processed(day(7)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".continuity").join("state.json");

        let mut ledger = Ledger::default();
        ledger.record(day(7), LedgerEntry::new("https://notion.so/abc", 3, 1));
        ledger.save(&path).unwrap();

        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded, ledger);
        assert!(reloaded.is_processed(day(7)));
        assert!(!reloaded.is_processed(day(8)));
        assert_eq!(reloaded.get(day(7)).unwrap().tasks_created, 3);
    }

    #[test]
    fn test_record_replaces_entry() {
        let mut ledger = Ledger::default();
        ledger.record(day(7), LedgerEntry::new("first", 1, 0));
        ledger.record(day(7), LedgerEntry::new("second", 2, 0));

        assert_eq!(ledger.entries.len(), 1);
        assert_eq!(ledger.get(day(7)).unwrap().page_url, "second");
    }

    #[test]
    fn test_guard_refuses_repeat_publish_without_force() {
        let mut ledger = Ledger::default();
        assert!(ledger.guard(day(7), false).is_ok());

        ledger.record(day(7), LedgerEntry::new("https://notion.so/abc", 2, 0));
        let err = ledger.guard(day(7), false).unwrap_err();
        assert!(matches!(err, ContinuityError::AlreadyProcessed(date) if date == day(7)));

        assert!(ledger.guard(day(7), true).is_ok());
        assert!(ledger.guard(day(8), false).is_ok());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(Ledger::load(&path), Err(LedgerError::Parse { .. })));
    }
}
