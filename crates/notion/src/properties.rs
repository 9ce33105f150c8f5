//! Builders for page property values, query filters, and sorts.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::blocks::rich_text;

#[must_use]
pub fn title(text: &str) -> Value {
    json!({ "title": rich_text(text) })
}

#[must_use]
pub fn checkbox(checked: bool) -> Value {
    json!({ "checkbox": checked })
}

/// Date property; `None` clears the value.
#[must_use]
pub fn date(day: Option<NaiveDate>) -> Value {
    match day {
        Some(day) => json!({ "date": { "start": day.format("%Y-%m-%d").to_string() } }),
        None => json!({ "date": null }),
    }
}

/// Select property; `None` clears the value.
#[must_use]
pub fn select(option: Option<&str>) -> Value {
    match option {
        Some(name) => json!({ "select": { "name": name } }),
        None => json!({ "select": null }),
    }
}

/// Filter: date property equals `day`.
#[must_use]
pub fn date_equals(property: &str, day: NaiveDate) -> Value {
    json!({
        "property": property,
        "date": { "equals": day.format("%Y-%m-%d").to_string() }
    })
}

/// Filter: checkbox property equals `checked`.
#[must_use]
pub fn checkbox_equals(property: &str, checked: bool) -> Value {
    json!({ "property": property, "checkbox": { "equals": checked } })
}

/// Compound filter matching when every condition matches.
#[must_use]
pub fn and(conditions: Vec<Value>) -> Value {
    json!({ "and": conditions })
}

#[must_use]
pub fn sort_ascending(property: &str) -> Value {
    json!({ "property": property, "direction": "ascending" })
}
