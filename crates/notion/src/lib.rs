//! Notion API gateway for the task continuity workflow.
//!
//! Every outbound call goes through one [`NotionClient`], which:
//!
//! - spaces consecutive requests by a minimum interval ([`RateLimiter`]),
//! - retries transient failures with exponential backoff ([`RetryPolicy`]),
//! - follows `has_more`/`next_cursor` pagination for database queries,
//! - classifies failures so callers can tell "retry later" from
//!   "grant the integration access" ([`NotionError`]).
//!
//! # Usage
//!
//! ```no_run
//! use notion::{ClientConfig, NotionClient};
//!
//! # async fn example() -> Result<(), notion::NotionError> {
//! let client = NotionClient::new(ClientConfig::new("secret_xxx"))?;
//! let pages = client
//!     .query_database("2656a6667ea28002b856c2fbf3f16a80", None, None)
//!     .await?;
//! println!("{} records", pages.len());
//! # Ok(())
//! # }
//! ```
//!
//! Time is read and slept through the [`Clock`] trait so the limiter and the
//! backoff schedule can be driven deterministically in tests with
//! [`ManualClock`].

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blocks;
pub mod client;
pub mod clock;
pub mod error;
pub mod limiter;
pub mod models;
pub mod properties;
pub mod retry;

pub use client::{ClientConfig, NotionClient, NOTION_API_BASE, NOTION_VERSION};
pub use clock::{Clock, ManualClock, TokioClock};
pub use error::{ErrorKind, NotionError};
pub use limiter::RateLimiter;
pub use models::{PageRef, Parent};
pub use retry::{retry_with_backoff, Retryable, RetryPolicy};
