//! Plain-text preview of a draft, shown before anything is written.

use chrono::NaiveDate;

use crate::domain::Task;
use crate::draft::PageDraft;
use crate::format::job_line;
use crate::page::{other_tasks, DAILY_HABITS, PRIORITIES, TASK_SECTIONS};

/// Render the draft as markdown-like text mirroring the page layout.
#[must_use]
pub fn render_draft(draft: &PageDraft, today: NaiveDate) -> String {
    let mut lines = vec![format!("# {}", draft.title()), String::new()];

    lines.push("## Left Column".to_string());
    lines.push(String::new());

    lines.push("### 🎯 Priorities".to_string());
    push_tasks(&mut lines, draft.tasks_in(PRIORITIES), "- No priority tasks");
    lines.push(String::new());

    lines.push("### 🔄 Daily Habits".to_string());
    push_tasks(&mut lines, draft.tasks_in(DAILY_HABITS), "- No daily habits");
    lines.push(String::new());

    lines.push("### 💼 Feature Jobs".to_string());
    if draft.jobs().is_empty() {
        lines.push("- No feature jobs selected".to_string());
    }
    for job in draft.jobs() {
        lines.push(format!("- ☐ {}", job_line(job, today)));
    }
    lines.push(String::new());

    lines.push("## Right Column".to_string());
    lines.push(String::new());

    for (category, icon) in TASK_SECTIONS {
        lines.push(format!("### {icon} {category}"));
        let empty = format!("- No {} tasks", category.to_lowercase());
        push_tasks(&mut lines, draft.tasks_in(category), &empty);
        lines.push(String::new());
    }

    let others = other_tasks(draft);
    if !others.is_empty() {
        lines.push("### ❓ Other Tasks".to_string());
        lines.extend(others.iter().map(|t| format!("- ☐ {}", t.name)));
        lines.push(String::new());
    }

    lines.push("## Summary".to_string());
    lines.push(format!("- Total carryover tasks: {}", draft.tasks().len()));
    lines.push(format!("- Feature jobs: {}", draft.jobs().len()));
    lines.push(format!("- Task categories: {}", draft.groups().len()));

    lines.join("\n")
}

fn push_tasks(lines: &mut Vec<String>, tasks: &[Task], empty: &str) {
    if tasks.is_empty() {
        lines.push(empty.to_string());
    }
    lines.extend(tasks.iter().map(|t| format!("- ☐ {}", t.name)));
}
