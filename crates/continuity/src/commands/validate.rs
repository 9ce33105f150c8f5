//! Validate command - check configuration and Notion access.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

use continuity::page::page_blocks;
use continuity::workflow::next_day;
use continuity::{render_draft, Config, ContinuityError, Job, PageDraft, Planner, Task};

use crate::ui::{self, CheckOutcome};

/// Verify configuration, connectivity, and database access.
#[derive(Args)]
pub struct ValidateCommand {}

impl ValidateCommand {
    pub async fn run(&self) -> Result<()> {
        ui::print_section("🔍 Validating Setup");
        let mut checks = Vec::new();

        let config = match Config::from_env() {
            Ok(config) => {
                checks.push(pass("Configuration", "all settings valid"));
                config
            }
            Err(err) => {
                checks.push(fail("Configuration", err.to_string()));
                return finish(&checks);
            }
        };

        let today = Local::now().date_naive();
        checks.push(page_generation(&config, today));

        let planner = Planner::new(config)?;
        match planner.client().validate_connection().await {
            Ok(()) => checks.push(pass("Notion connection", "API key accepted")),
            Err(err) => {
                checks.push(fail("Notion connection", with_hint(&ContinuityError::from(err))));
                return finish(&checks);
            }
        }

        let databases = [
            ("Plan AI database", planner.config().plan_database_id.clone()),
            ("Job Tracker database", planner.config().job_database_id.clone()),
        ];
        for (name, id) in databases {
            checks.push(match planner.database_title(&id).await {
                Ok(title) => pass(name, format!("'{title}' is accessible")),
                Err(err) => fail(name, with_hint(&err)),
            });
        }

        checks.push(match planner.fetch_uncompleted_tasks(today).await {
            Ok(tasks) => pass("Task query", format!("{} open tasks for today", tasks.len())),
            Err(err) => fail("Task query", with_hint(&err)),
        });

        finish(&checks)
    }
}

/// Build a page from sample content without touching Notion.
fn page_generation(config: &Config, today: NaiveDate) -> CheckOutcome {
    let draft = PageDraft::new(
        next_day(today),
        today,
        vec![
            Task::new("Sample priority", "Priorities", None),
            Task::new("Sample follow-up", "Networking", None),
        ],
        vec![Job::new("Sample Research Engineer").with_deadline(today)],
        config.selection(),
    );
    let blocks = page_blocks(&draft, today, &config.plan_database_id, &config.job_database_id);
    let preview = render_draft(&draft, today);

    if blocks.is_empty() || preview.is_empty() {
        fail("Page generation", "template produced no content")
    } else {
        pass(
            "Page generation",
            format!("{} top-level blocks, {} preview lines", blocks.len(), preview.lines().count()),
        )
    }
}

fn pass(name: &'static str, details: impl Into<String>) -> CheckOutcome {
    CheckOutcome {
        name,
        passed: true,
        details: details.into(),
    }
}

fn fail(name: &'static str, details: impl Into<String>) -> CheckOutcome {
    CheckOutcome {
        name,
        passed: false,
        details: details.into(),
    }
}

fn with_hint(err: &ContinuityError) -> String {
    match err.remediation() {
        Some(hint) => format!("{err}\n{hint}"),
        None => err.to_string(),
    }
}

fn finish(checks: &[CheckOutcome]) -> Result<()> {
    for check in checks {
        let reason = (!check.passed).then_some(check.details.as_str());
        ui::print_check_result(check.name, check.passed, reason);
    }
    println!();
    println!("{}", ui::validation_table(checks));

    let failed = checks.iter().filter(|c| !c.passed).count();
    if failed == 0 {
        ui::print_success("All checks passed");
        Ok(())
    } else {
        anyhow::bail!("{failed} of {} checks failed", checks.len());
    }
}
