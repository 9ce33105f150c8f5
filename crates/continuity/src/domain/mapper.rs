//! Conversion between raw Notion page objects and [`Task`]/[`Job`].
//!
//! Required structure (`id`, `properties`) fails closed with [`MapError`].
//! Every optional property fails open to its default: a missing, null, or
//! mistyped property never aborts a mapping.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use notion::properties;

use super::job::{Job, JobPriority};
use super::task::{Task, TaskPriority};

/// Property names shared by both databases and the writer.
pub mod fields {
    pub const NAME: &str = "Name";
    pub const STATUS: &str = "Status";
    pub const NEXT_REMINDER: &str = "Next reminder";
    pub const PRIORITY_LEVEL: &str = "Priority Level";
    pub const CATEGORY: &str = "Category";
    pub const DEADLINE: &str = "Deadline";
    pub const PRIORITY: &str = "Priority";
    pub const APPLICATION_LINK: &str = "Application Link";
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Map a Plan AI page to a [`Task`].
pub fn to_task(raw: &Value) -> Result<Task, MapError> {
    let (id, props) = record_parts(raw)?;
    Ok(Task {
        id,
        name: title_text(props, fields::NAME),
        completed: checkbox_value(props, fields::STATUS),
        target_date: date_value(props, fields::NEXT_REMINDER),
        priority_level: task_priority(props),
        category: select_name(props, fields::CATEGORY).unwrap_or_default(),
    })
}

fn task_priority(props: &Map<String, Value>) -> Option<TaskPriority> {
    let name = select_name(props, fields::PRIORITY_LEVEL)?;
    let priority = TaskPriority::parse(&name);
    if priority.is_none() {
        debug!(value = %name, "Unrecognised priority level; treating as unset");
    }
    priority
}

/// Map a Job Tracker page to a [`Job`].
pub fn to_job(raw: &Value) -> Result<Job, MapError> {
    let (id, props) = record_parts(raw)?;
    Ok(Job {
        id,
        name: title_text(props, fields::NAME),
        deadline: date_value(props, fields::DEADLINE),
        priority: select_name(props, fields::PRIORITY).and_then(|name| JobPriority::parse(&name)),
        application_link: props
            .get(fields::APPLICATION_LINK)
            .and_then(|p| p.get("url"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}

/// Property map for writing `task` as a new Plan AI row.
///
/// `Name` and `Status` are always present; the rest only when set.
#[must_use]
pub fn task_to_fields(task: &Task) -> Value {
    let mut map = Map::new();
    map.insert(fields::NAME.into(), properties::title(&task.name));
    map.insert(fields::STATUS.into(), properties::checkbox(task.completed));
    if let Some(date) = task.target_date {
        map.insert(fields::NEXT_REMINDER.into(), properties::date(Some(date)));
    }
    if let Some(priority) = task.priority_level {
        map.insert(
            fields::PRIORITY_LEVEL.into(),
            properties::select(Some(priority.as_str())),
        );
    }
    if !task.category.is_empty() {
        map.insert(
            fields::CATEGORY.into(),
            properties::select(Some(task.category.as_str())),
        );
    }
    Value::Object(map)
}

/// Parse an ISO-8601 date or date-time, keeping the calendar date as written.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

fn record_parts(raw: &Value) -> Result<(String, &Map<String, Value>), MapError> {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .ok_or(MapError::MissingField("id"))?;
    let props = raw
        .get("properties")
        .and_then(Value::as_object)
        .ok_or(MapError::MissingField("properties"))?;
    Ok((id.to_string(), props))
}

fn title_text(props: &Map<String, Value>, name: &str) -> String {
    props
        .get(name)
        .and_then(|p| p.get("title"))
        .and_then(Value::as_array)
        .map(|fragments| {
            fragments
                .iter()
                .filter_map(|f| {
                    f.get("plain_text")
                        .or_else(|| f.get("text").and_then(|t| t.get("content")))
                        .and_then(Value::as_str)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn checkbox_value(props: &Map<String, Value>, name: &str) -> bool {
    props
        .get(name)
        .and_then(|p| p.get("checkbox"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn date_value(props: &Map<String, Value>, name: &str) -> Option<NaiveDate> {
    props
        .get(name)
        .and_then(|p| p.get("date"))
        .and_then(|d| d.get("start"))
        .and_then(Value::as_str)
        .and_then(parse_date)
}

fn select_name(props: &Map<String, Value>, name: &str) -> Option<String> {
    props
        .get(name)
        .and_then(|p| p.get("select"))
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
