//! Notion block tree of the daily planner page.

use chrono::NaiveDate;
use notion::{blocks, properties};
use serde_json::{json, Value};

use crate::domain::{Task, SCHEDULE_CATEGORY};
use crate::draft::PageDraft;
use crate::format::{checkbox, job_line};

pub const PRIORITIES: &str = "Priorities";
pub const DAILY_HABITS: &str = "Daily Habits";

/// Right-column task categories with their icons, in page order.
pub const TASK_SECTIONS: [(&str, &str); 4] = [
    ("Application Focus", "📋"),
    ("Research & Learning", "📚"),
    ("Networking", "🤝"),
    ("Pipeline Development", "🔧"),
];

const STRATEGIC_NOTES_HINT: &str = "Key insights and strategic thinking for today...";
const SCHEDULE_HINT: &str = "Day-specific time blocks (don't carry over)";

/// Whether tasks of `category` land in the "Other Tasks" callout.
#[must_use]
pub fn is_other_category(category: &str) -> bool {
    category != PRIORITIES
        && category != DAILY_HABITS
        && category != SCHEDULE_CATEGORY
        && !TASK_SECTIONS.iter().any(|(name, _)| *name == category)
}

/// Tasks outside every named section, in grouped order.
#[must_use]
pub fn other_tasks(draft: &PageDraft) -> Vec<&Task> {
    draft
        .groups()
        .iter()
        .filter(|g| is_other_category(&g.category))
        .flat_map(|g| g.tasks.iter())
        .collect()
}

/// Properties of the page itself (child pages only carry a title).
#[must_use]
pub fn page_properties(title: &str) -> Value {
    json!({ "title": properties::title(title) })
}

/// Full page body: two columns, a divider, then links to both databases.
#[must_use]
pub fn page_blocks(
    draft: &PageDraft,
    today: NaiveDate,
    plan_database_id: &str,
    job_database_id: &str,
) -> Vec<Value> {
    vec![
        blocks::column_list(vec![
            blocks::column(left_column(draft, today)),
            blocks::column(right_column(draft)),
        ]),
        blocks::divider(),
        blocks::link_to_database(plan_database_id),
        blocks::link_to_database(job_database_id),
    ]
}

fn left_column(draft: &PageDraft, today: NaiveDate) -> Vec<Value> {
    let jobs: Vec<String> = draft
        .jobs()
        .iter()
        .map(|job| checkbox(&job_line(job, today), false))
        .collect();

    vec![
        section(
            "🎯",
            PRIORITIES,
            &checklist(draft.tasks_in(PRIORITIES)),
            "No priority tasks for today",
        ),
        section(
            "🔄",
            DAILY_HABITS,
            &checklist(draft.tasks_in(DAILY_HABITS)),
            "No daily habits defined",
        ),
        section("📝", "Strategic Notes", "", STRATEGIC_NOTES_HINT),
        section(
            "💼",
            "Feature Jobs",
            &jobs.join("\n"),
            "No priority jobs selected today",
        ),
    ]
}

fn right_column(draft: &PageDraft) -> Vec<Value> {
    let mut column = vec![
        section("⏰", "Schedule", "", SCHEDULE_HINT),
        blocks::heading_2("Tasks"),
    ];

    for (category, icon) in TASK_SECTIONS {
        let empty = format!("No {} tasks for today", category.to_lowercase());
        column.push(section(
            icon,
            category,
            &checklist(draft.tasks_in(category)),
            &empty,
        ));
    }

    let others: Vec<Task> = other_tasks(draft).into_iter().cloned().collect();
    if !others.is_empty() {
        column.push(section("❓", "Other Tasks", &checklist(&others), ""));
    }
    column
}

/// Callout reading "title", a blank line, then `content` or `empty`.
fn section(icon: &str, title: &str, content: &str, empty: &str) -> Value {
    let body = if content.is_empty() { empty } else { content };
    blocks::callout(icon, &format!("{title}\n\n{body}"))
}

fn checklist(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| checkbox(&t.name, t.completed))
        .collect::<Vec<_>>()
        .join("\n")
}
