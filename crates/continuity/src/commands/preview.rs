//! Preview command - show tomorrow's draft without writing anything.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use continuity::render_draft;

use super::{gather, load_planner, print_plan, resolve_today};
use crate::ui;

/// Build the draft for tomorrow and print it.
#[derive(Args)]
pub struct PreviewCommand {
    /// Processing date (YYYY-MM-DD); defaults to today.
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,
}

impl PreviewCommand {
    pub async fn run(&self) -> Result<()> {
        let today = resolve_today(self.date);
        let planner = load_planner()?;
        let plan = gather(&planner, today).await?;

        print_plan(&plan, today);
        ui::print_section("👀 Page Preview");
        println!("{}", render_draft(&plan.draft, today));
        println!();
        ui::print_info("Preview only; nothing was written to Notion");
        Ok(())
    }
}
