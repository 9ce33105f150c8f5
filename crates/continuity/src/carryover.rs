//! Task carryover onto the next processing date.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::Task;

/// Tasks re-targeted for the next date, plus how many schedule items were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryoverOutcome {
    pub tasks: Vec<Task>,
    pub excluded: usize,
}

impl CarryoverOutcome {
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

/// Re-create every non-schedule task as a fresh, uncompleted task for `next_date`.
///
/// Output order equals input order. Source tasks are not touched; each
/// output task is a new record with an empty id.
#[must_use]
pub fn carryover(tasks: &[Task], next_date: NaiveDate) -> CarryoverOutcome {
    let mut outcome = CarryoverOutcome::default();

    for task in tasks {
        if task.is_schedule() {
            debug!(task = %task.name, "Excluding schedule item");
            outcome.excluded += 1;
            continue;
        }
        outcome.tasks.push(Task {
            id: String::new(),
            name: task.name.clone(),
            completed: false,
            target_date: Some(next_date),
            priority_level: task.priority_level,
            category: task.category.clone(),
        });
    }

    info!(
        carried = outcome.tasks.len(),
        excluded = outcome.excluded,
        %next_date,
        "Prepared carryover tasks"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskPriority, SCHEDULE_CATEGORY};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn stored(id: &str, name: &str, category: &str) -> Task {
        Task {
            id: id.into(),
            name: name.into(),
            completed: false,
            target_date: Some(day(6)),
            priority_level: Some(TaskPriority::Medium),
            category: category.into(),
        }
    }

    #[test]
    fn test_schedule_dropped_sibling_carried() {
        let tasks = vec![
            stored("a", "9am standup", SCHEDULE_CATEGORY),
            stored("b", "Submit application", "Priorities"),
        ];
        let outcome = carryover(&tasks, day(7));

        assert_eq!(outcome.excluded, 1);
        assert_eq!(outcome.tasks.len(), 1);
        let carried = &outcome.tasks[0];
        assert_eq!(carried.name, "Submit application");
        assert_eq!(carried.target_date, Some(day(7)));
        assert!(!carried.completed);
        assert!(carried.id.is_empty());
        assert_eq!(carried.priority_level, Some(TaskPriority::Medium));
    }

    #[test]
    fn test_completed_flag_is_reset() {
        let mut done = stored("c", "Half finished", "Networking");
        done.completed = true;

        let outcome = carryover(&[done], day(7));
        assert!(outcome.tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_order_preserved_after_filtering() {
        let tasks = vec![
            stored("1", "first", "Networking"),
            stored("2", "block", SCHEDULE_CATEGORY),
            stored("3", "second", "Priorities"),
            stored("4", "third", ""),
        ];
        let names: Vec<String> = carryover(&tasks, day(7))
            .into_tasks()
            .into_iter()
            .map(|t| t.name)
            .collect();

        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_schedule_match_is_exact() {
        // Only the exact reserved category is dropped.
        let tasks = vec![stored("x", "plan", "schedule"), stored("y", "plan", "Schedules")];
        assert_eq!(carryover(&tasks, day(7)).tasks.len(), 2);
        assert!(carryover(&[], day(7)).tasks.is_empty());
    }
}
