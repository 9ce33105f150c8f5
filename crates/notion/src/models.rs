//! Request and response shapes exchanged with the Notion API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a new page is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parent {
    /// Row in a database; properties must match the database schema.
    DatabaseId(String),
    /// Sub-page of a regular page; only `title` is accepted as a property.
    PageId(String),
}

impl Parent {
    /// The referenced database or page id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::DatabaseId(id) | Self::PageId(id) => id,
        }
    }
}

/// A page Notion reported back after creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageRef {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl PageRef {
    /// Public URL for the page. Falls back to `https://notion.so/{id}` with dashes removed.
    #[must_use]
    pub fn web_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("https://notion.so/{}", self.id.replace('-', "")))
    }
}

/// One page of a `POST /databases/{id}/query` response.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Body of a database query request.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorts: Option<&'a Value>,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// Body of a page creation request.
#[derive(Debug, Serialize)]
pub(crate) struct CreatePageRequest<'a> {
    pub parent: &'a Parent,
    pub properties: &'a Value,
    #[serde(skip_serializing_if = "<[Value]>::is_empty")]
    pub children: &'a [Value],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parent_serializes_as_tagged_object() {
        let db = Parent::DatabaseId("abc".into());
        let page = Parent::PageId("def".into());

        assert_eq!(serde_json::to_value(&db).unwrap(), json!({"database_id": "abc"}));
        assert_eq!(serde_json::to_value(&page).unwrap(), json!({"page_id": "def"}));
        assert_eq!(page.id(), "def");
    }

    #[test]
    fn test_page_url_fallback_strips_dashes() {
        let page = PageRef {
            id: "1234abcd-0000-1111-2222-333344445555".into(),
            url: None,
        };
        assert_eq!(
            page.web_url(),
            "https://notion.so/1234abcd000011112222333344445555"
        );
    }

    #[test]
    fn test_query_request_omits_empty_fields() {
        let body = QueryRequest {
            filter: None,
            sorts: None,
            page_size: 100,
            start_cursor: None,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"page_size": 100}));
    }
}
