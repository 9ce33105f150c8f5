//! End-to-end workflow: read today's state from Notion, build the draft for
//! tomorrow, and publish it once approved.

use chrono::{Days, NaiveDate};
use notion::{properties, NotionClient, Parent};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::carryover::carryover;
use crate::config::Config;
use crate::domain::mapper::fields;
use crate::domain::{task_to_fields, to_job, to_task, Job, Task};
use crate::draft::PageDraft;
use crate::error::Result;
use crate::format::page_url;
use crate::page::{page_blocks, page_properties};
use crate::scoring::{rank_candidates, select_top, ScoredJob};

/// Everything gathered for one run, before review.
#[derive(Debug, Clone)]
pub struct DailyPlan {
    pub draft: PageDraft,
    /// Uncompleted tasks found for `today`, before filtering.
    pub source_tasks: Vec<Task>,
    /// Schedule items left behind.
    pub excluded: usize,
    /// Every keyword-matching job, best first.
    pub candidates: Vec<ScoredJob>,
}

/// Outcome of publishing a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub page_id: String,
    pub page_url: String,
    pub created_ids: Vec<String>,
    /// One line per task record that could not be written.
    pub failures: Vec<String>,
}

impl PublishReport {
    #[must_use]
    pub fn tasks_created(&self) -> usize {
        self.created_ids.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the gateway and configuration for one run.
#[derive(Debug)]
pub struct Planner {
    client: NotionClient,
    config: Config,
}

impl Planner {
    pub fn new(config: Config) -> Result<Self> {
        let client = NotionClient::new(config.client_config())?;
        Ok(Self { client, config })
    }

    /// Use an already configured gateway (tests point it at a mock server).
    #[must_use]
    pub fn with_client(client: NotionClient, config: Config) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn client(&self) -> &NotionClient {
        &self.client
    }

    /// Plan AI tasks due on `date` that are not done yet.
    #[instrument(skip(self))]
    pub async fn fetch_uncompleted_tasks(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let filter = properties::and(vec![
            properties::date_equals(fields::NEXT_REMINDER, date),
            properties::checkbox_equals(fields::STATUS, false),
        ]);
        let pages = self
            .client
            .query_database(&self.config.plan_database_id, Some(&filter), None)
            .await?;
        let tasks = pages.iter().map(to_task).collect::<std::result::Result<Vec<_>, _>>()?;

        info!(count = tasks.len(), %date, "Fetched uncompleted tasks");
        Ok(tasks)
    }

    /// Every Job Tracker row, by deadline then priority.
    #[instrument(skip(self))]
    pub async fn fetch_jobs(&self) -> Result<Vec<Job>> {
        let sorts = json!([
            properties::sort_ascending(fields::DEADLINE),
            properties::sort_ascending(fields::PRIORITY),
        ]);
        let pages = self
            .client
            .query_database(&self.config.job_database_id, None, Some(&sorts))
            .await?;
        let jobs = pages.iter().map(to_job).collect::<std::result::Result<Vec<_>, _>>()?;

        info!(count = jobs.len(), "Fetched jobs");
        Ok(jobs)
    }

    /// The jobs to feature on the page built on `today`.
    pub async fn feature_jobs(&self, today: NaiveDate) -> Result<Vec<Job>> {
        let jobs = self.fetch_jobs().await?;
        Ok(select_top(&jobs, &self.config.selection(), today))
    }

    /// Gather tasks and jobs for `today` and draft the page for the day after.
    #[instrument(skip(self))]
    pub async fn plan(&self, today: NaiveDate) -> Result<DailyPlan> {
        let target = next_day(today);
        let source_tasks = self.fetch_uncompleted_tasks(today).await?;
        let outcome = carryover(&source_tasks, target);
        let excluded = outcome.excluded;

        let selection = self.config.selection();
        let jobs = self.fetch_jobs().await?;
        let candidates = rank_candidates(&jobs, &selection, today);
        let featured: Vec<Job> = candidates
            .iter()
            .take(selection.max_feature_jobs)
            .map(|c| c.job.clone())
            .collect();

        info!(
            tasks = outcome.tasks.len(),
            excluded,
            candidates = candidates.len(),
            featured = featured.len(),
            %target,
            "Draft ready for review"
        );

        Ok(DailyPlan {
            draft: PageDraft::new(target, today, outcome.into_tasks(), featured, selection),
            source_tasks,
            excluded,
            candidates,
        })
    }

    pub async fn build_draft(&self, today: NaiveDate) -> Result<PageDraft> {
        Ok(self.plan(today).await?.draft)
    }

    /// Create the daily page, then one Plan AI record per carried task.
    ///
    /// A failure to create or fill the page is returned as an error. Task
    /// records are written one by one; individual failures are logged and
    /// collected in the report.
    #[instrument(skip(self, draft), fields(target = %draft.target_date(), tasks = draft.tasks().len()))]
    pub async fn publish(&self, draft: &PageDraft) -> Result<PublishReport> {
        let parent = Parent::PageId(self.config.planner_parent_id.clone());
        let page = self
            .client
            .create_page(&parent, &page_properties(draft.title()), &[])
            .await?;
        let body: Vec<Value> = page_blocks(
            draft,
            draft.built_on(),
            &self.config.plan_database_id,
            &self.config.job_database_id,
        );
        self.client.append_blocks(&page.id, &body).await?;

        let mut report = PublishReport {
            page_url: page_url(&page.id),
            page_id: page.id,
            ..PublishReport::default()
        };
        info!(url = %report.page_url, "Created daily page");

        let database = Parent::DatabaseId(self.config.plan_database_id.clone());
        for task in draft.tasks() {
            match self
                .client
                .create_page(&database, &task_to_fields(task), &[])
                .await
            {
                Ok(created) => report.created_ids.push(created.id),
                Err(err) => {
                    warn!(task = %task.name, error = %err, "Failed to create task record");
                    report.failures.push(format!("{}: {err}", task.name));
                }
            }
        }

        info!(
            created = report.tasks_created(),
            failed = report.failures.len(),
            "Published carryover tasks"
        );
        Ok(report)
    }

    /// Title of a database, confirming the integration can read it.
    #[instrument(skip(self))]
    pub async fn database_title(&self, database_id: &str) -> Result<String> {
        let database = self.client.retrieve_database(database_id).await?;
        Ok(plain_title(&database))
    }
}

/// The day after `date`.
#[must_use]
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

fn plain_title(database: &Value) -> String {
    database["title"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["plain_text"].as_str())
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_day_rolls_over_months() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();
        assert_eq!(next_day(d), NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    }

    #[test]
    fn test_plain_title() {
        let db = json!({ "title": [{ "plain_text": "Plan " }, { "plain_text": "AI" }] });
        assert_eq!(plain_title(&db), "Plan AI");
        assert_eq!(plain_title(&json!({})), "Untitled");
    }

    #[test]
    fn test_report_counts() {
        let report = PublishReport {
            created_ids: vec!["a".into(), "b".into()],
            failures: vec!["c: boom".into()],
            ..PublishReport::default()
        };
        assert_eq!(report.tasks_created(), 2);
        assert!(!report.is_complete());
    }
}
