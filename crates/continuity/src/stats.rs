//! Summary counts and pattern insights over carryover tasks.

use serde::Serialize;

use crate::domain::{Task, TaskPriority};
use crate::draft::group_by_category;

/// More categories than this triggers a focus hint.
const MAX_FOCUSED_CATEGORIES: usize = 3;
/// Share of all tasks above which one category dominates.
const HEAVY_FOCUS_SHARE: f64 = 0.4;
const MAX_HIGH_PRIORITY: usize = 5;
const MAX_UNPRIORITISED: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub no_priority: usize,
    /// Category counts in first-appearance order; empty categories count as "Uncategorized".
    pub by_category: Vec<(String, usize)>,
}

impl TaskStats {
    #[must_use]
    pub fn collect(tasks: &[Task]) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        };
        for task in tasks {
            match task.priority_level {
                Some(TaskPriority::High) => stats.high += 1,
                Some(TaskPriority::Medium) => stats.medium += 1,
                Some(TaskPriority::Low) => stats.low += 1,
                None => stats.no_priority += 1,
            }
        }
        stats.by_category = group_by_category(tasks)
            .into_iter()
            .map(|g| (g.category, g.tasks.len()))
            .collect();
        stats
    }

    /// Hints about how the remaining work is spread.
    #[must_use]
    pub fn insights(&self) -> Vec<String> {
        let mut insights = Vec::new();
        if self.total == 0 {
            return insights;
        }

        if self.by_category.len() > MAX_FOCUSED_CATEGORIES {
            insights.push(format!(
                "Tasks span {} categories - consider focusing",
                self.by_category.len()
            ));
        }

        // First category wins ties.
        let heaviest = self
            .by_category
            .iter()
            .fold(None::<&(String, usize)>, |best, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            });
        if let Some((category, count)) = heaviest {
            if *count as f64 > self.total as f64 * HEAVY_FOCUS_SHARE {
                insights.push(format!("Heavy focus on {category} ({count} tasks)"));
            }
        }

        if self.high > MAX_HIGH_PRIORITY {
            insights.push(format!(
                "{} high-priority tasks - review priorities",
                self.high
            ));
        }
        if self.no_priority > MAX_UNPRIORITISED {
            insights.push(format!(
                "{} tasks lack priority - consider prioritizing",
                self.no_priority
            ));
        }
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(rows: &[(&str, Option<TaskPriority>)]) -> Vec<Task> {
        rows.iter()
            .enumerate()
            .map(|(i, (category, priority))| Task::new(format!("task {i}"), *category, *priority))
            .collect()
    }

    #[test]
    fn test_counts() {
        let stats = TaskStats::collect(&tasks(&[
            ("Networking", Some(TaskPriority::High)),
            ("", None),
            ("Networking", Some(TaskPriority::Low)),
            ("Priorities", Some(TaskPriority::Medium)),
        ]));

        assert_eq!(stats.total, 4);
        assert_eq!((stats.high, stats.medium, stats.low, stats.no_priority), (1, 1, 1, 1));
        assert_eq!(
            stats.by_category,
            vec![
                ("Networking".to_string(), 2),
                ("Uncategorized".to_string(), 1),
                ("Priorities".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_insights_fire_on_thresholds() {
        let mut rows = vec![("Networking", Some(TaskPriority::High)); 6];
        rows.extend([("A", None), ("B", None), ("C", None), ("D", None)]);
        let insights = TaskStats::collect(&tasks(&rows)).insights();

        assert_eq!(
            insights,
            vec![
                "Tasks span 5 categories - consider focusing",
                "Heavy focus on Networking (6 tasks)",
                "6 high-priority tasks - review priorities",
                "4 tasks lack priority - consider prioritizing",
            ]
        );
    }

    #[test]
    fn test_balanced_tasks_have_no_insights() {
        let stats = TaskStats::collect(&tasks(&[
            ("A", Some(TaskPriority::Low)),
            ("B", Some(TaskPriority::Low)),
            ("C", None),
        ]));
        assert!(stats.insights().is_empty());
        assert!(TaskStats::collect(&[]).insights().is_empty());
    }
}
