//! # Notion API client
//!
//! A thin gateway over the handful of Notion endpoints the continuity
//! workflow needs. All calls share one rate limiter and one retry policy.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, TokioClock};
use crate::error::NotionError;
use crate::limiter::{RateLimiter, DEFAULT_MIN_INTERVAL};
use crate::models::{CreatePageRequest, PageRef, Parent, QueryRequest, QueryResponse};
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Notion REST endpoint
pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// API version pinned for every request
pub const NOTION_VERSION: &str = "2022-06-28";

/// Largest page Notion returns from a database query.
const QUERY_PAGE_SIZE: u32 = 100;

/// Notion rejects block appends with more than this many children.
const MAX_BLOCKS_PER_APPEND: usize = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`NotionClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub min_interval: Duration,
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Defaults: public API, 340 ms spacing, 3 retries from 1 s doubling, 30 s timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: NOTION_API_BASE.to_string(),
            min_interval: DEFAULT_MIN_INTERVAL,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another host (mock servers in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("min_interval", &self.min_interval)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Rate-limited, retrying Notion client.
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .field("limiter", &self.limiter)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl NotionClient {
    /// Create a client that sleeps on the tokio timer.
    ///
    /// # Errors
    /// Returns [`NotionError::Config`] if the API key is not a valid header
    /// value, or [`NotionError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, NotionError> {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Create a client with an injected clock.
    ///
    /// # Errors
    /// See [`NotionClient::new`].
    pub fn with_clock(config: ClientConfig, clock: Arc<dyn Clock>) -> Result<Self, NotionError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| NotionError::Config("API key contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(concat!("continuity/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            limiter: RateLimiter::new(config.min_interval, clock.clone()),
            retry: config.retry,
            clock,
        })
    }

    /// Check that the API key is accepted by listing workspace users.
    ///
    /// # Errors
    /// [`NotionError::Unauthorized`] for a rejected key, or any transport error.
    #[instrument(skip(self))]
    pub async fn validate_connection(&self) -> Result<(), NotionError> {
        self.send(Method::GET, "/users", None, "users").await?;
        info!("Notion connection validated");
        Ok(())
    }

    /// Fetch a database's metadata (title and property schema).
    ///
    /// # Errors
    /// [`NotionError::NotFound`] or [`NotionError::Forbidden`] when the
    /// database is missing or not shared with the integration.
    #[instrument(skip(self))]
    pub async fn retrieve_database(&self, database_id: &str) -> Result<Value, NotionError> {
        let resource = format!("database {database_id}");
        self.send(
            Method::GET,
            &format!("/databases/{database_id}"),
            None,
            &resource,
        )
        .await
    }

    /// Query a database and return every matching page across all result pages.
    ///
    /// # Errors
    /// Returns the first error that survives the retry policy; pages fetched
    /// before it are discarded.
    #[instrument(skip(self, filter, sorts))]
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<&Value>,
        sorts: Option<&Value>,
    ) -> Result<Vec<Value>, NotionError> {
        let path = format!("/databases/{database_id}/query");
        let resource = format!("database {database_id}");
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = serde_json::to_value(QueryRequest {
                filter,
                sorts,
                page_size: QUERY_PAGE_SIZE,
                start_cursor: cursor.as_deref(),
            })?;
            let response = self.send(Method::POST, &path, Some(&body), &resource).await?;
            let page: QueryResponse = serde_json::from_value(response)?;

            debug!(count = page.results.len(), has_more = page.has_more, "Fetched query page");
            results.extend(page.results);

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                (true, None) => {
                    warn!(database_id, "Query reported more results without a cursor; stopping");
                    break;
                }
                (false, _) => break,
            }
        }

        debug!(total = results.len(), "Database query complete");
        Ok(results)
    }

    /// Create a page with properties and optional body blocks.
    ///
    /// # Errors
    /// Any API or transport error; [`NotionError::InvalidResponse`] if the
    /// reply carries no page id.
    #[instrument(skip(self, properties, children), fields(parent = %parent.id(), blocks = children.len()))]
    pub async fn create_page(
        &self,
        parent: &Parent,
        properties: &Value,
        children: &[Value],
    ) -> Result<PageRef, NotionError> {
        let body = serde_json::to_value(CreatePageRequest {
            parent,
            properties,
            children,
        })?;
        let response = self.send(Method::POST, "/pages", Some(&body), "pages").await?;
        let page: PageRef = serde_json::from_value(response)
            .map_err(|e| NotionError::InvalidResponse(format!("page without id: {e}")))?;

        debug!(page_id = %page.id, "Created page");
        Ok(page)
    }

    /// Update properties of an existing page.
    ///
    /// # Errors
    /// Any API or transport error.
    #[instrument(skip(self, properties))]
    pub async fn update_page(&self, page_id: &str, properties: &Value) -> Result<Value, NotionError> {
        let body = serde_json::json!({ "properties": properties });
        let resource = format!("page {page_id}");
        self.send(Method::PATCH, &format!("/pages/{page_id}"), Some(&body), &resource)
            .await
    }

    /// Append child blocks to a page or block, batching to the API's limit.
    ///
    /// # Errors
    /// Any API or transport error. Batches already appended stay appended.
    #[instrument(skip(self, children), fields(blocks = children.len()))]
    pub async fn append_blocks(&self, block_id: &str, children: &[Value]) -> Result<(), NotionError> {
        let path = format!("/blocks/{block_id}/children");
        let resource = format!("block {block_id}");
        for batch in children.chunks(MAX_BLOCKS_PER_APPEND) {
            let body = serde_json::json!({ "children": batch });
            self.send(Method::PATCH, &path, Some(&body), &resource).await?;
        }
        Ok(())
    }

    /// Issue one logical request through the retry policy.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        resource: &str,
    ) -> Result<Value, NotionError> {
        let url = format!("{}{}", self.base_url, path);
        let operation = format!("{method} {path}");
        let this = self;
        let method = &method;
        let url = url.as_str();

        retry_with_backoff(&self.retry, self.clock.as_ref(), &operation, move || {
            this.attempt(method.clone(), url, body, resource)
        })
        .await
    }

    /// One HTTP attempt: wait for the limiter, send, classify the status.
    async fn attempt(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        resource: &str,
    ) -> Result<Value, NotionError> {
        self.limiter.acquire().await;

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let text = response.text().await.map_err(NotionError::Body)?;
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
        let text = response.text().await.unwrap_or_default();

        debug!(status = status.as_u16(), resource, "Notion request failed");
        Err(NotionError::from_status(
            status.as_u16(),
            resource,
            &text,
            retry_after,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("secret_abc");
        assert_eq!(config.base_url, NOTION_API_BASE);
        assert_eq!(config.min_interval, Duration::from_millis(340));
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("k").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("secret_super_private");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super_private"));
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let err = NotionClient::new(ClientConfig::new("bad\nkey")).unwrap_err();
        assert!(matches!(err, NotionError::Config(_)));
    }
}
