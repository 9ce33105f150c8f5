//! The daily page draft and its pure edit transitions.
//!
//! The review shell never mutates a draft in place: every edit is an
//! [`EditCommand`] applied with [`PageDraft::apply`], which either returns the
//! next draft or rejects the command and leaves the caller's draft intact.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Job, Task, TaskPriority};
use crate::format::page_title;
use crate::scoring::{score, SelectionConfig};

/// Categories offered when adding or re-filing a task.
pub const EDITABLE_CATEGORIES: [&str; 6] = [
    "Priorities",
    "Daily Habits",
    "Application Focus",
    "Research & Learning",
    "Networking",
    "Pipeline Development",
];

/// Category preselected for manually added tasks.
pub const DEFAULT_NEW_TASK_CATEGORY: &str = "Application Focus";

/// Tasks sharing one category, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub category: String,
    pub tasks: Vec<Task>,
}

/// One reviewable edit.
///
/// Task indices are 0-based positions in [`PageDraft::listed_tasks`], the
/// grouped order shown to the user. Job indices are positions in
/// [`PageDraft::jobs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    AddTask {
        name: String,
        category: String,
        priority: Option<TaskPriority>,
    },
    RemoveTasks {
        indices: Vec<usize>,
    },
    SetPriority {
        indices: Vec<usize>,
        priority: Option<TaskPriority>,
    },
    SetCategory {
        indices: Vec<usize>,
        category: String,
    },
    RemoveJobs {
        indices: Vec<usize>,
    },
    /// Re-rank the remaining jobs by score.
    ReorderJobs,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("task name cannot be empty")]
    EmptyName,

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("no items selected")]
    EmptySelection,

    #[error("task {index} is out of range (draft has {len} tasks)")]
    TaskOutOfRange { index: usize, len: usize },

    #[error("job {index} is out of range (draft has {len} feature jobs)")]
    JobOutOfRange { index: usize, len: usize },
}

/// Candidate content of tomorrow's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    target_date: NaiveDate,
    built_on: NaiveDate,
    title: String,
    tasks: Vec<Task>,
    jobs: Vec<Job>,
    groups: Vec<TaskGroup>,
    selection: SelectionConfig,
}

impl PageDraft {
    /// Assemble a draft for `target_date` from carryover tasks and selected jobs.
    ///
    /// `built_on` and `selection` are kept so [`EditCommand::ReorderJobs`]
    /// scores jobs exactly as the initial selection did.
    #[must_use]
    pub fn new(
        target_date: NaiveDate,
        built_on: NaiveDate,
        tasks: Vec<Task>,
        jobs: Vec<Job>,
        selection: SelectionConfig,
    ) -> Self {
        let groups = group_by_category(&tasks);
        Self {
            target_date,
            built_on,
            title: page_title(target_date),
            tasks,
            jobs,
            groups,
            selection,
        }
    }

    #[must_use]
    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// Day the draft was built; deadlines are labelled relative to it.
    #[must_use]
    pub fn built_on(&self) -> NaiveDate {
        self.built_on
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Category groups in first-appearance order.
    #[must_use]
    pub fn groups(&self) -> &[TaskGroup] {
        &self.groups
    }

    /// Tasks of one category, empty when the category has none.
    #[must_use]
    pub fn tasks_in(&self, category: &str) -> &[Task] {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.tasks.as_slice())
            .unwrap_or_default()
    }

    /// Tasks in the grouped order the editor numbers them.
    #[must_use]
    pub fn listed_tasks(&self) -> Vec<&Task> {
        self.groups.iter().flat_map(|g| g.tasks.iter()).collect()
    }

    /// Listing positions of tasks whose name contains `query` (case-insensitive).
    #[must_use]
    pub fn find_tasks(&self, query: &str) -> Vec<usize> {
        let query = query.trim().to_lowercase();
        self.listed_tasks()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect()
    }

    /// Apply one edit, returning the next draft.
    pub fn apply(self, command: EditCommand) -> Result<PageDraft, EditError> {
        match command {
            EditCommand::AddTask {
                name,
                category,
                priority,
            } => self.add_task(&name, &category, priority),
            EditCommand::RemoveTasks { indices } => {
                let targets = self.resolve_tasks(&indices)?;
                let tasks = self
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !targets.contains(i))
                    .map(|(_, t)| t.clone())
                    .collect();
                Ok(self.with_tasks(tasks))
            }
            EditCommand::SetPriority { indices, priority } => {
                let targets = self.resolve_tasks(&indices)?;
                let mut tasks = self.tasks.clone();
                for i in targets {
                    tasks[i].priority_level = priority;
                }
                Ok(self.with_tasks(tasks))
            }
            EditCommand::SetCategory { indices, category } => {
                let category = category.trim();
                if category.is_empty() {
                    return Err(EditError::EmptyCategory);
                }
                let targets = self.resolve_tasks(&indices)?;
                let mut tasks = self.tasks.clone();
                for i in targets {
                    tasks[i].category = category.to_string();
                }
                Ok(self.with_tasks(tasks))
            }
            EditCommand::RemoveJobs { indices } => {
                if indices.is_empty() {
                    return Err(EditError::EmptySelection);
                }
                let len = self.jobs.len();
                if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                    return Err(EditError::JobOutOfRange { index, len });
                }
                let jobs = self
                    .jobs
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !indices.contains(i))
                    .map(|(_, j)| j.clone())
                    .collect();
                Ok(PageDraft { jobs, ..self })
            }
            EditCommand::ReorderJobs => {
                let mut scored: Vec<_> = self
                    .jobs
                    .iter()
                    .map(|j| score(j, &self.selection, self.built_on))
                    .collect();
                scored.sort_by_key(|s| s.total_score);
                let jobs = scored.into_iter().map(|s| s.job).collect();
                Ok(PageDraft { jobs, ..self })
            }
        }
    }

    fn add_task(
        self,
        name: &str,
        category: &str,
        priority: Option<TaskPriority>,
    ) -> Result<PageDraft, EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName);
        }
        let category = match category.trim() {
            "" => DEFAULT_NEW_TASK_CATEGORY,
            c => c,
        };
        let task = Task::new(name, category, priority).with_target_date(self.target_date);
        let mut tasks = self.tasks.clone();
        tasks.push(task);
        Ok(self.with_tasks(tasks))
    }

    /// Map listing positions to positions in `self.tasks`.
    fn resolve_tasks(&self, indices: &[usize]) -> Result<Vec<usize>, EditError> {
        if indices.is_empty() {
            return Err(EditError::EmptySelection);
        }
        let listing = self.listing();
        indices
            .iter()
            .map(|&index| {
                listing.get(index).copied().ok_or(EditError::TaskOutOfRange {
                    index,
                    len: listing.len(),
                })
            })
            .collect()
    }

    /// `self.tasks` positions in grouped order.
    fn listing(&self) -> Vec<usize> {
        let mut order: Vec<&str> = Vec::new();
        for task in &self.tasks {
            if !order.contains(&task.group_name()) {
                order.push(task.group_name());
            }
        }
        order
            .iter()
            .flat_map(|category| {
                self.tasks
                    .iter()
                    .enumerate()
                    .filter(move |(_, t)| t.group_name() == *category)
                    .map(|(i, _)| i)
            })
            .collect()
    }

    fn with_tasks(self, tasks: Vec<Task>) -> PageDraft {
        let groups = group_by_category(&tasks);
        PageDraft {
            tasks,
            groups,
            ..self
        }
    }
}

/// Group tasks by category, keeping first-appearance order of categories.
#[must_use]
pub fn group_by_category(tasks: &[Task]) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|g| g.category == task.group_name()) {
            Some(group) => group.tasks.push(task.clone()),
            None => groups.push(TaskGroup {
                category: task.group_name().to_string(),
                tasks: vec![task.clone()],
            }),
        }
    }
    groups
}
