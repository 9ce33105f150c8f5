//! Init-env command - write a sample environment file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use continuity::config::{write_sample_env, DEFAULT_SAMPLE_ENV_PATH};

use crate::ui;

/// Write a sample `.env` file listing every setting.
#[derive(Args)]
pub struct InitEnvCommand {
    /// Destination file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_SAMPLE_ENV_PATH)]
    path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

impl InitEnvCommand {
    pub fn run(&self) -> Result<()> {
        write_sample_env(&self.path, self.force)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        ui::print_success(&format!("Sample configuration written to {}", self.path.display()));
        ui::print_info("Copy it to .env and fill in NOTION_API_KEY");
        Ok(())
    }
}
