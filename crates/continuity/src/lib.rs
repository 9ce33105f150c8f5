//! Daily task continuity for a Notion planner.
//!
//! Each run reads the uncompleted Plan AI tasks due today, re-creates them
//! for tomorrow (schedule items excluded), picks a handful of feature jobs
//! from the Job Tracker, and publishes a new daily page once a human approves
//! the draft.
//!
//! The crate is split so that everything a person reviews is pure:
//!
//! - [`scoring`] ranks jobs, [`carryover`] re-targets tasks,
//! - [`draft::PageDraft`] holds the candidate page and its edit transitions,
//! - [`render`] and [`page`] turn a draft into a text preview or Notion blocks.
//!
//! Only [`workflow::Planner`] talks to Notion, through the `notion` gateway.

pub mod carryover;
pub mod config;
pub mod domain;
pub mod draft;
pub mod error;
pub mod format;
pub mod ledger;
pub mod page;
pub mod render;
pub mod scoring;
pub mod stats;
pub mod workflow;

pub use carryover::{carryover, CarryoverOutcome};
pub use config::{Config, ValidationError};
pub use domain::{Job, JobPriority, Task, TaskPriority};
pub use draft::{EditCommand, EditError, PageDraft};
pub use error::{ContinuityError, Result};
pub use ledger::{Ledger, LedgerEntry};
pub use render::render_draft;
pub use scoring::{rank_candidates, score, select_top, ScoredJob, SelectionConfig};
pub use stats::TaskStats;
pub use workflow::{DailyPlan, Planner, PublishReport};
