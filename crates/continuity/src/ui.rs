//! Console output helpers for the continuity CLI.

use std::time::Duration;

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use continuity::format::{clean_job_title, deadline_label, display_date, truncate_text};
use continuity::{PageDraft, ScoredJob, TaskStats};

/// Rows shown in the job selection table.
const JOB_TABLE_ROWS: usize = 10;

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", "═".repeat(70).bright_black());
    println!("{}", title.cyan().bold());
    println!("{}", "═".repeat(70).bright_black());
    println!();
}

/// Print a step indicator with message.
pub fn print_step(message: &str) {
    println!("{} {}", "▶".cyan(), message.bold());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print one validation check line, with the reason when there is one.
pub fn print_check_result(name: &str, passed: bool, message: Option<&str>) {
    println!("{}", check_line(name, passed, message));
}

fn check_line(name: &str, passed: bool, message: Option<&str>) -> String {
    let status = if passed { "✓".green() } else { "✗".red() };
    match message {
        Some(msg) => format!("  {status} {name} - {msg}"),
        None => format!("  {status} {name}"),
    }
}

/// Spinner shown while waiting on Notion.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {wide_msg}") {
        bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Per-category and per-priority counts of the carried tasks.
pub fn task_breakdown_table(stats: &TaskStats) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Tasks").fg(Color::Cyan),
    ]);

    for (category, count) in &stats.by_category {
        table.add_row(vec![Cell::new(category), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Total").fg(Color::Yellow),
        Cell::new(stats.total).fg(Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Priority (high / med / low / none)").fg(Color::DarkGrey),
        Cell::new(format!(
            "{} / {} / {} / {}",
            stats.high, stats.medium, stats.low, stats.no_priority
        ))
        .fg(Color::DarkGrey),
    ]);
    table
}

/// Top candidates with their score and whether they made the page.
pub fn job_selection_table(candidates: &[ScoredJob], selected: usize, today: NaiveDate) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Job Title").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Deadline").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Selected").fg(Color::Cyan),
    ]);

    for (i, scored) in candidates.iter().take(JOB_TABLE_ROWS).enumerate() {
        let category = scored
            .category
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let priority = scored.job.priority.map_or("-", |p| p.badge());
        let chosen = i < selected;

        table.add_row(vec![
            Cell::new(truncate_text(&clean_job_title(&scored.job.name), 40)),
            Cell::new(category),
            Cell::new(priority),
            Cell::new(deadline_label(scored.job.deadline, today)),
            Cell::new(scored.total_score),
            if chosen {
                Cell::new("✅").fg(Color::Green)
            } else {
                Cell::new("")
            },
        ]);
    }
    table
}

/// Outcome of one `validate` check.
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub details: String,
}

pub fn validation_table(checks: &[CheckOutcome]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Check").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Details").fg(Color::Cyan),
    ]);

    for check in checks {
        let (status, color) = if check.passed {
            ("PASS", Color::Green)
        } else {
            ("FAIL", Color::Red)
        };
        table.add_row(vec![
            Cell::new(check.name),
            Cell::new(status).fg(color),
            Cell::new(&check.details),
        ]);
    }
    table
}

/// Numbered task listing in the order edit commands address it.
pub fn print_task_listing(draft: &PageDraft) {
    if draft.tasks().is_empty() {
        print_info("No tasks in this draft");
        return;
    }
    let mut number = 1;
    for group in draft.groups() {
        println!("{}", group.category.cyan().bold());
        for task in &group.tasks {
            let badge = task.priority_level.map(|p| p.badge()).unwrap_or_default();
            println!("  {:>2}. {} {}", number, task.name, badge.bright_black());
            number += 1;
        }
    }
}

pub fn print_job_listing(draft: &PageDraft) {
    if draft.jobs().is_empty() {
        print_info("No feature jobs in this draft");
        return;
    }
    for (i, job) in draft.jobs().iter().enumerate() {
        let line = continuity::format::job_line(job, draft.built_on());
        println!("  {:>2}. {}", i + 1, line);
    }
}

/// Final summary shown before approval.
pub fn print_approval_summary(draft: &PageDraft) {
    print_section("📋 Final Review");
    println!("  {} {}", "Title:".bold(), draft.title());
    println!("  {} {}", "Target date:".bold(), display_date(draft.target_date()));
    println!("  {} {}", "Tasks:".bold(), draft.tasks().len());
    println!("  {} {}", "Feature jobs:".bold(), draft.jobs().len());
    let categories: Vec<&str> = draft.groups().iter().map(|g| g.category.as_str()).collect();
    let categories = if categories.is_empty() {
        "none".to_string()
    } else {
        categories.join(", ")
    };
    println!("  {} {}", "Active categories:".bold(), categories);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_line_shows_failure_reason() {
        let failed = check_line("Plan AI database", false, Some("Not found: database"));
        assert!(failed.contains("✗"));
        assert!(failed.ends_with("Plan AI database - Not found: database"));

        let passed = check_line("Configuration", true, None);
        assert!(passed.contains("✓"));
        assert!(passed.ends_with("Configuration"));
    }
}
