//! Run command - build, review, and publish tomorrow's page.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use continuity::format::display_date;
use continuity::ledger::{Ledger, LedgerEntry, DEFAULT_STATE_PATH};
use continuity::workflow::next_day;
use continuity::ContinuityError;

use super::{gather, load_planner, print_plan, resolve_today};
use crate::{review, ui};

/// Carry today's open tasks to tomorrow and publish the daily page.
#[derive(Args)]
pub struct RunCommand {
    /// Processing date (YYYY-MM-DD); defaults to today.
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Publish the generated draft without the interactive review.
    #[arg(short, long)]
    yes: bool,

    /// Publish even if a page for the target date was already created.
    #[arg(long)]
    force: bool,

    /// Processed-date ledger file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_STATE_PATH)]
    state: PathBuf,
}

impl RunCommand {
    pub async fn run(&self) -> Result<()> {
        let today = resolve_today(self.date);
        let target = next_day(today);
        ui::print_section(&format!("🗓  Daily Planner for {}", display_date(target)));

        let mut ledger = Ledger::load(&self.state).map_err(ContinuityError::from)?;
        ledger.guard(target, self.force)?;
        if ledger.is_processed(target) {
            ui::print_warning("A page for this date already exists; publishing again (--force)");
        }

        let planner = load_planner()?;
        let plan = gather(&planner, today).await?;
        print_plan(&plan, today);

        let draft = if self.yes {
            plan.draft
        } else {
            ui::print_section("📝 Review");
            review::review(plan.draft)?
        };

        ui::print_step("Publishing to Notion");
        let spinner = ui::spinner("Creating page and task records...");
        let report = planner.publish(&draft).await;
        spinner.finish_and_clear();
        let report = report?;

        ledger.record(
            target,
            LedgerEntry::new(&report.page_url, report.tasks_created(), report.failures.len()),
        );
        ledger.save(&self.state).map_err(ContinuityError::from)?;
        info!(state = %self.state.display(), %target, "Recorded publish");

        ui::print_success(&format!("Page created: {}", report.page_url));
        ui::print_success(&format!(
            "{} of {} task records created",
            report.tasks_created(),
            draft.tasks().len()
        ));
        for failure in &report.failures {
            ui::print_warning(failure);
        }
        Ok(())
    }
}
