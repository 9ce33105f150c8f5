//! Subcommands of the `continuity` binary.

pub mod init_env;
pub mod preview;
pub mod run;
pub mod validate;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use continuity::{Config, ContinuityError, DailyPlan, Planner, TaskStats};

use crate::ui;

/// Processing date: `--date` when given, otherwise today in local time.
fn resolve_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

fn load_planner() -> Result<Planner> {
    let config = Config::from_env().map_err(ContinuityError::from)?;
    Ok(Planner::new(config)?)
}

/// Fetch everything for `today` behind a spinner.
async fn gather(planner: &Planner, today: NaiveDate) -> Result<DailyPlan> {
    let spinner = ui::spinner("Fetching tasks and jobs from Notion...");
    let plan = planner.plan(today).await;
    spinner.finish_and_clear();
    Ok(plan?)
}

/// Task breakdown, insights, and the job selection analysis.
fn print_plan(plan: &DailyPlan, today: NaiveDate) {
    ui::print_section("📊 Carryover Tasks");
    ui::print_info(&format!(
        "{} uncompleted tasks found, {} schedule items left behind",
        plan.source_tasks.len(),
        plan.excluded
    ));

    let stats = TaskStats::collect(plan.draft.tasks());
    if stats.total > 0 {
        println!("{}", ui::task_breakdown_table(&stats));
    }
    for insight in stats.insights() {
        ui::print_warning(&insight);
    }

    ui::print_section("💼 Job Selection Analysis");
    if plan.candidates.is_empty() {
        ui::print_info("No jobs match the configured keywords");
    } else {
        println!(
            "{}",
            ui::job_selection_table(&plan.candidates, plan.draft.jobs().len(), today)
        );
    }
}
