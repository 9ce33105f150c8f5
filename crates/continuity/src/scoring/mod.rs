//! Job scoring and feature-job selection.
//!
//! Each candidate gets three independent ranks (title category, explicit
//! priority, deadline urgency) that are summed into a total score. Lower
//! totals rank first. Titles matching no keyword are not candidates and are
//! never scored.

mod category;

pub use category::{JobCategory, JobKeywords};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Job, JobPriority};

/// Default number of feature jobs on the daily page.
pub const DEFAULT_MAX_FEATURE_JOBS: usize = 4;

/// Rank used for titles outside every keyword bucket.
pub const UNCATEGORIZED_RANK: u8 = 5;

/// Urgency of a job without a deadline; pushes it to the bottom.
pub const NO_DEADLINE_URGENCY: u8 = 100;

/// Inputs that shape selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    pub keywords: JobKeywords,
    pub max_feature_jobs: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            keywords: JobKeywords::default(),
            max_feature_jobs: DEFAULT_MAX_FEATURE_JOBS,
        }
    }
}

/// A job with its score breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredJob {
    pub job: Job,
    pub category: Option<JobCategory>,
    pub category_rank: u8,
    pub priority_rank: u8,
    pub deadline_urgency: u8,
    pub total_score: u32,
}

/// `{HighPrior: 1, MidPrior: 2, LowPrior: 3, none: 4}`
#[must_use]
pub fn priority_rank(priority: Option<JobPriority>) -> u8 {
    match priority {
        Some(JobPriority::HighPrior) => 1,
        Some(JobPriority::MidPrior) => 2,
        Some(JobPriority::LowPrior) => 3,
        None => 4,
    }
}

/// Bucketed urgency of a deadline relative to `today`. Overdue is most urgent.
#[must_use]
pub fn deadline_urgency(deadline: Option<NaiveDate>, today: NaiveDate) -> u8 {
    let Some(deadline) = deadline else {
        return NO_DEADLINE_URGENCY;
    };
    match (deadline - today).num_days() {
        d if d < 0 => 0,
        0..=1 => 1,
        2..=3 => 2,
        4..=7 => 3,
        _ => 4,
    }
}

/// Score one job.
#[must_use]
pub fn score(job: &Job, config: &SelectionConfig, today: NaiveDate) -> ScoredJob {
    let category = config.keywords.classify(&job.name);
    let category_rank = category.map_or(UNCATEGORIZED_RANK, |c| c.rank());
    let priority_rank = priority_rank(job.priority);
    let deadline_urgency = deadline_urgency(job.deadline, today);

    ScoredJob {
        job: job.clone(),
        category,
        category_rank,
        priority_rank,
        deadline_urgency,
        total_score: u32::from(category_rank)
            + u32::from(priority_rank)
            + u32::from(deadline_urgency),
    }
}

/// Score every keyword-matching job and sort ascending by total score.
///
/// The sort is stable, so ties keep the query order.
#[must_use]
pub fn rank_candidates(jobs: &[Job], config: &SelectionConfig, today: NaiveDate) -> Vec<ScoredJob> {
    let mut candidates: Vec<ScoredJob> = jobs
        .iter()
        .filter(|job| config.keywords.classify(&job.name).is_some())
        .map(|job| score(job, config, today))
        .collect();
    candidates.sort_by_key(|c| c.total_score);

    debug!(
        jobs = jobs.len(),
        candidates = candidates.len(),
        "Ranked job candidates"
    );
    candidates
}

/// The top `max_feature_jobs` candidates, best first.
#[must_use]
pub fn select_top(jobs: &[Job], config: &SelectionConfig, today: NaiveDate) -> Vec<Job> {
    rank_candidates(jobs, config, today)
        .into_iter()
        .take(config.max_feature_jobs)
        .map(|scored| scored.job)
        .collect()
}
