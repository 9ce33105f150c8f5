//! Typed views of the two Notion databases.

pub mod job;
pub mod mapper;
pub mod task;

pub use job::{Job, JobPriority};
pub use mapper::{task_to_fields, to_job, to_task, MapError};
pub use task::{Task, TaskPriority, SCHEDULE_CATEGORY, UNCATEGORIZED};
