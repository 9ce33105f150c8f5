//! Continuity CLI.
//!
//! Carries today's unfinished Notion tasks over to tomorrow, picks the
//! feature jobs worth attention, and publishes the next daily planner page
//! after an interactive review.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use continuity::config::{log_filter, DEFAULT_LOG_FILTER};
use continuity::ContinuityError;

mod commands;
mod review;
mod ui;

use commands::init_env::InitEnvCommand;
use commands::preview::PreviewCommand;
use commands::run::RunCommand;
use commands::validate::ValidateCommand;

/// Daily task continuity for a Notion planner.
#[derive(Parser)]
#[command(
    name = "continuity",
    version,
    about = "Carry unfinished Notion tasks into tomorrow's planner page",
    long_about = "Reads today's uncompleted Plan AI tasks, re-creates them for tomorrow\n\
                  (schedule items excluded), selects feature jobs from the Job Tracker,\n\
                  and publishes a new daily planner page after you review the draft."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, review, and publish tomorrow's page.
    Run(RunCommand),

    /// Print tomorrow's draft without writing anything.
    Preview(PreviewCommand),

    /// Check configuration, connectivity, and database access.
    Validate(ValidateCommand),

    /// Write a sample environment file.
    InitEnv(InitEnvCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(cmd) => cmd.run().await,
        Commands::Preview(cmd) => cmd.run().await,
        Commands::Validate(cmd) => cmd.run().await,
        Commands::InitEnv(cmd) => cmd.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ContinuityError>() {
                Some(ContinuityError::UserCancelled) => {
                    ui::print_warning("Cancelled; nothing was written to Notion");
                }
                Some(known) => {
                    tracing::error!(error = %known, "Run failed");
                    ui::print_error(&known.to_string());
                    if let Some(hint) = known.remediation() {
                        ui::print_info(hint);
                    }
                }
                None => {
                    tracing::error!(error = %err, "Run failed");
                    ui::print_error(&format!("{err:#}"));
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = std::env::var("LOG_LEVEL").ok();
    let filter = EnvFilter::try_new(log_filter(verbose, level.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
