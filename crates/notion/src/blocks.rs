//! Builders for Notion block objects.
//!
//! Each function returns the JSON Notion expects in a `children` array.

use serde_json::{json, Value};

/// Notion rejects a single rich-text item longer than this.
pub const MAX_TEXT_LEN: usize = 2000;

/// Split `text` into rich-text items no longer than [`MAX_TEXT_LEN`] characters.
#[must_use]
pub fn rich_text(text: &str) -> Value {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return json!([]);
    }
    let items: Vec<Value> = chars
        .chunks(MAX_TEXT_LEN)
        .map(|chunk| {
            let content: String = chunk.iter().collect();
            json!({ "type": "text", "text": { "content": content } })
        })
        .collect();
    Value::Array(items)
}

#[must_use]
pub fn paragraph(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": rich_text(text) }
    })
}

#[must_use]
pub fn heading_2(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "heading_2",
        "heading_2": { "rich_text": rich_text(text) }
    })
}

/// Callout with an emoji icon and a gray background.
#[must_use]
pub fn callout(emoji: &str, text: &str) -> Value {
    json!({
        "object": "block",
        "type": "callout",
        "callout": {
            "rich_text": rich_text(text),
            "icon": { "type": "emoji", "emoji": emoji },
            "color": "gray_background"
        }
    })
}

#[must_use]
pub fn divider() -> Value {
    json!({ "object": "block", "type": "divider", "divider": {} })
}

/// One column holding `children`.
#[must_use]
pub fn column(children: Vec<Value>) -> Value {
    json!({
        "object": "block",
        "type": "column",
        "column": { "children": children }
    })
}

/// Side-by-side layout; each element of `columns` should come from [`column`].
#[must_use]
pub fn column_list(columns: Vec<Value>) -> Value {
    json!({
        "object": "block",
        "type": "column_list",
        "column_list": { "children": columns }
    })
}

/// Inline link to an existing database.
///
/// The public API cannot create `child_database` blocks that point at an
/// existing database, so linked views are rendered as `link_to_page`.
#[must_use]
pub fn link_to_database(database_id: &str) -> Value {
    json!({
        "object": "block",
        "type": "link_to_page",
        "link_to_page": { "type": "database_id", "database_id": database_id }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_item() {
        let rt = rich_text("hello");
        assert_eq!(rt.as_array().unwrap().len(), 1);
        assert_eq!(rt[0]["text"]["content"], "hello");
    }

    #[test]
    fn test_long_text_is_chunked() {
        let text = "x".repeat(MAX_TEXT_LEN * 2 + 5);
        let rt = rich_text(&text);
        let items = rt.as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["text"]["content"].as_str().unwrap().len(), 5);
    }

    #[test]
    fn test_chunking_respects_multibyte_characters() {
        let text = "☐".repeat(MAX_TEXT_LEN + 1);
        let rt = rich_text(&text);
        assert_eq!(rt.as_array().unwrap().len(), 2);
        assert_eq!(rt[1]["text"]["content"], "☐");
    }

    #[test]
    fn test_callout_shape() {
        let block = callout("🎯", "Priorities");
        assert_eq!(block["type"], "callout");
        assert_eq!(block["callout"]["icon"]["emoji"], "🎯");
        assert_eq!(block["callout"]["rich_text"][0]["text"]["content"], "Priorities");
    }

    #[test]
    fn test_column_list_nests_columns() {
        let layout = column_list(vec![column(vec![divider()]), column(vec![])]);
        let cols = layout["column_list"]["children"].as_array().unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0]["column"]["children"][0]["type"], "divider");
    }

    #[test]
    fn test_link_to_database() {
        let block = link_to_database("abc");
        assert_eq!(block["link_to_page"]["database_id"], "abc");
    }
}
