//! Text helpers shared by the preview renderer and the page template.

use chrono::NaiveDate;

use crate::domain::Job;

/// Prefix of every daily page title.
pub const PAGE_TITLE_PREFIX: &str = "AI Daily Planner with Completion Tracking";

/// "September 6, 2025"
#[must_use]
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[must_use]
pub fn page_title(date: NaiveDate) -> String {
    format!("{PAGE_TITLE_PREFIX} - {}", display_date(date))
}

/// Cut `text` to at most `max_len` characters, ending in "..." when cut.
#[must_use]
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Strip a trailing company or location from a job title.
///
/// "Research Scientist - DeepMind" becomes "Research Scientist". The head is
/// only kept when it is longer than ten characters, so "ML Eng at X" stays.
#[must_use]
pub fn clean_job_title(title: &str) -> String {
    let mut cleaned = title.trim().to_string();
    for sep in [" - ", " at ", " | "] {
        if let Some((head, _)) = cleaned.split_once(sep) {
            let head = head.trim();
            if head.chars().count() > 10 {
                cleaned = head.to_string();
            }
        }
    }
    cleaned
}

/// Human label for a deadline relative to `today`.
#[must_use]
pub fn deadline_label(deadline: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(deadline) = deadline else {
        return "No deadline".to_string();
    };
    match (deadline - today).num_days() {
        d if d < 0 => format!("⚠️  {} days overdue", -d),
        0 => "🔥 Due today".to_string(),
        1 => "🔥 Due tomorrow".to_string(),
        d @ 2..=3 => format!("🟡 Due in {d} days"),
        d @ 4..=7 => format!("🟢 Due in {d} days"),
        d => format!("Due in {d} days"),
    }
}

/// "☐ text" or "☑️ text".
#[must_use]
pub fn checkbox(text: &str, checked: bool) -> String {
    let mark = if checked { "☑️" } else { "☐" };
    format!("{mark} {text}")
}

/// One feature-job line: cleaned title, deadline when set, priority badge when set.
#[must_use]
pub fn job_line(job: &Job, today: NaiveDate) -> String {
    let mut line = clean_job_title(&job.name);
    if job.deadline.is_some() {
        line.push_str(&format!(" (Deadline: {})", deadline_label(job.deadline, today)));
    }
    if let Some(priority) = job.priority {
        line.push_str(&format!(" [{}]", priority.badge()));
    }
    line
}

/// Short web URL for a page id.
#[must_use]
pub fn page_url(page_id: &str) -> String {
    format!("https://notion.so/{}", page_id.replace('-', ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobPriority;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 6).unwrap()
    }

    #[test]
    fn test_page_title() {
        assert_eq!(
            page_title(today()),
            "AI Daily Planner with Completion Tracking - September 6, 2025"
        );
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_text("this is far too long", 10), "this is...");
        assert_eq!(truncate_text("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_clean_job_title() {
        assert_eq!(
            clean_job_title("Research Scientist - DeepMind"),
            "Research Scientist"
        );
        assert_eq!(
            clean_job_title("Machine Learning Engineer at Acme | Remote"),
            "Machine Learning Engineer"
        );
        assert_eq!(clean_job_title("ML Eng at X"), "ML Eng at X");
        assert_eq!(clean_job_title("  Intern  "), "Intern");
    }

    #[test]
    fn test_deadline_labels() {
        let at = |d: i64| deadline_label(Some(today() + Duration::days(d)), today());
        assert_eq!(at(-2), "⚠️  2 days overdue");
        assert_eq!(at(0), "🔥 Due today");
        assert_eq!(at(1), "🔥 Due tomorrow");
        assert_eq!(at(3), "🟡 Due in 3 days");
        assert_eq!(at(7), "🟢 Due in 7 days");
        assert_eq!(at(12), "Due in 12 days");
        assert_eq!(deadline_label(None, today()), "No deadline");
    }

    #[test]
    fn test_job_line() {
        let job = Job::new("AI Researcher - Lab")
            .with_deadline(today())
            .with_priority(JobPriority::HighPrior);
        assert_eq!(
            job_line(&job, today()),
            "AI Researcher (Deadline: 🔥 Due today) [🔴 High]"
        );
        assert_eq!(job_line(&Job::new("Software Developer"), today()), "Software Developer");
    }

    #[test]
    fn test_page_url_strips_dashes() {
        assert_eq!(page_url("ab-cd-ef"), "https://notion.so/abcdef");
    }
}
