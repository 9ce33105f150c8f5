//! Configuration for the continuity workflow.
//!
//! Everything is read from environment variables. The binary loads a `.env`
//! file first (via `dotenvy`), so the same keys work in either place.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use notion::{ClientConfig, RetryPolicy};
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::scoring::{JobKeywords, SelectionConfig, DEFAULT_MAX_FEATURE_JOBS};

/// Default Plan AI database.
pub const DEFAULT_PLAN_AI_DATABASE_ID: &str = "2656a6667ea28002b856c2fbf3f16a80";

/// Default Job Tracker database.
pub const DEFAULT_JOB_TRACKER_DATABASE_ID: &str = "2666a6667ea28074a138ffb541b4e3c9";

/// Default parent page for the daily planner pages.
pub const DEFAULT_DAILY_PLANNER_PARENT_ID: &str = "2356a6667ea280efb26aea8e14d4990a";

/// Default spacing between Notion requests, in seconds.
pub const DEFAULT_RATE_LIMIT_SECS: f64 = 0.34;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default first retry delay, in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;

/// Tracing filter used when `LOG_LEVEL` is unset.
pub const DEFAULT_LOG_FILTER: &str = "continuity=info,notion=info,warn";
pub const VERBOSE_LOG_FILTER: &str = "continuity=debug,notion=debug,info";

/// Default location of the sample environment file.
pub const DEFAULT_SAMPLE_ENV_PATH: &str = ".env.sample";

/// Accepted prefixes of Notion integration tokens.
const API_KEY_PREFIXES: [&str; 2] = ["secret_", "ntn_"];

/// A configuration key with an unusable value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{key}: {message}")]
pub struct ValidationError {
    pub key: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }
}

/// Validated configuration.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub plan_database_id: String,
    pub job_database_id: String,
    pub planner_parent_id: String,
    pub keywords: JobKeywords,
    pub max_feature_jobs: usize,
    /// Minimum spacing between Notion requests.
    pub rate_limit: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("plan_database_id", &self.plan_database_id)
            .field("job_database_id", &self.job_database_id)
            .field("planner_parent_id", &self.planner_parent_id)
            .field("keywords", &self.keywords.len())
            .field("max_feature_jobs", &self.max_feature_jobs)
            .field("rate_limit", &self.rate_limit)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl Config {
    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `NOTION_API_KEY`: integration token (`secret_…` or `ntn_…`)
    ///
    /// # Optional Environment Variables
    /// - `PLAN_AI_DATABASE_ID`, `JOB_TRACKER_DATABASE_ID`,
    ///   `DAILY_PLANNER_PARENT_ID`: IDs or Notion URLs
    /// - `JOB_KEYWORDS_RESEARCH`, `JOB_KEYWORDS_AI_ML`,
    ///   `JOB_KEYWORDS_INTERNSHIP`, `JOB_KEYWORDS_ENGINEER`: comma lists
    /// - `MAX_FEATURE_JOBS` (default: 4)
    /// - `NOTION_RATE_LIMIT` seconds (default: 0.34)
    /// - `MAX_RETRIES` (default: 3), `RETRY_DELAY` seconds (default: 1.0)
    ///
    /// `LOG_LEVEL` is read separately by [`log_filter`], before any other
    /// configuration, so logging works even when validation fails.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("NOTION_API_KEY")
            .ok_or_else(|| ValidationError::new("NOTION_API_KEY", "is required"))?;
        if !API_KEY_PREFIXES.iter().any(|p| api_key.starts_with(p)) {
            return Err(ValidationError::new(
                "NOTION_API_KEY",
                "must start with 'secret_' or 'ntn_'",
            ));
        }

        let defaults = JobKeywords::default();
        let keywords = JobKeywords {
            research: get("JOB_KEYWORDS_RESEARCH").map_or(defaults.research, |v| split_list(&v)),
            ai_ml: get("JOB_KEYWORDS_AI_ML").map_or(defaults.ai_ml, |v| split_list(&v)),
            internship: get("JOB_KEYWORDS_INTERNSHIP")
                .map_or(defaults.internship, |v| split_list(&v)),
            engineer: get("JOB_KEYWORDS_ENGINEER").map_or(defaults.engineer, |v| split_list(&v)),
        };

        let max_feature_jobs = match get("MAX_FEATURE_JOBS") {
            None => DEFAULT_MAX_FEATURE_JOBS,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ValidationError::new(
                        "MAX_FEATURE_JOBS",
                        format!("must be an integer >= 1, got '{raw}'"),
                    ))
                }
            },
        };

        let max_retries = match get("MAX_RETRIES") {
            None => DEFAULT_MAX_RETRIES,
            Some(raw) => raw.parse().map_err(|_| {
                ValidationError::new("MAX_RETRIES", format!("must be an integer, got '{raw}'"))
            })?,
        };

        Ok(Self {
            api_key,
            plan_database_id: database_id(
                "PLAN_AI_DATABASE_ID",
                get("PLAN_AI_DATABASE_ID"),
                DEFAULT_PLAN_AI_DATABASE_ID,
            )?,
            job_database_id: database_id(
                "JOB_TRACKER_DATABASE_ID",
                get("JOB_TRACKER_DATABASE_ID"),
                DEFAULT_JOB_TRACKER_DATABASE_ID,
            )?,
            planner_parent_id: database_id(
                "DAILY_PLANNER_PARENT_ID",
                get("DAILY_PLANNER_PARENT_ID"),
                DEFAULT_DAILY_PLANNER_PARENT_ID,
            )?,
            keywords,
            max_feature_jobs,
            rate_limit: seconds("NOTION_RATE_LIMIT", get("NOTION_RATE_LIMIT"), DEFAULT_RATE_LIMIT_SECS)?,
            max_retries,
            retry_delay: seconds("RETRY_DELAY", get("RETRY_DELAY"), DEFAULT_RETRY_DELAY_SECS)?,
        })
    }

    /// Selection inputs for the scoring engine.
    #[must_use]
    pub fn selection(&self) -> SelectionConfig {
        SelectionConfig {
            keywords: self.keywords.clone(),
            max_feature_jobs: self.max_feature_jobs,
        }
    }

    /// Gateway settings derived from this configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_key.clone())
            .with_min_interval(self.rate_limit)
            .with_retry(RetryPolicy {
                max_retries: self.max_retries,
                initial_delay: self.retry_delay,
                ..RetryPolicy::default()
            })
    }
}

fn notion_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)([0-9a-f]{32})$").ok())
        .as_ref()
}

/// Extract a 32-character Notion ID from a bare ID, a dashed UUID, or a Notion URL.
///
/// The result is lower-case without dashes.
#[must_use]
pub fn extract_notion_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let candidate = match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string))?,
        _ => raw.to_string(),
    };
    let compact = candidate.replace('-', "");

    let pattern = notion_id_pattern()?;
    let id = pattern.captures(&compact)?.get(1)?.as_str().to_lowercase();
    // A bare value must be the ID and nothing else; URL slugs may carry a title.
    if candidate == raw && compact.len() != 32 {
        return None;
    }
    Some(id)
}

fn database_id(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<String, ValidationError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    extract_notion_id(&raw).ok_or_else(|| {
        ValidationError::new(key, format!("'{raw}' is not a 32-character Notion ID or URL"))
    })
}

fn seconds(
    key: &'static str,
    value: Option<String>,
    default: f64,
) -> Result<Duration, ValidationError> {
    let Some(raw) = value else {
        return Ok(Duration::from_secs_f64(default));
    };
    raw.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| {
            ValidationError::new(key, format!("must be a non-negative number of seconds, got '{raw}'"))
        })
}

/// Split a comma list, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tracing filter directive: `--verbose` wins, then a non-blank `LOG_LEVEL`,
/// then [`DEFAULT_LOG_FILTER`].
#[must_use]
pub fn log_filter(verbose: bool, log_level: Option<&str>) -> &str {
    if verbose {
        return VERBOSE_LOG_FILTER;
    }
    log_level
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_LOG_FILTER)
}

/// Contents of a sample environment file.
#[must_use]
pub fn sample_env() -> String {
    let defaults = JobKeywords::default();
    format!(
        "# AI Task Continuity System Configuration\n\
         \n\
         # Notion integration token\n\
         NOTION_API_KEY=secret_your_api_key_here\n\
         \n\
         # Database and page IDs (bare IDs or Notion URLs)\n\
         PLAN_AI_DATABASE_ID={DEFAULT_PLAN_AI_DATABASE_ID}\n\
         JOB_TRACKER_DATABASE_ID={DEFAULT_JOB_TRACKER_DATABASE_ID}\n\
         DAILY_PLANNER_PARENT_ID={DEFAULT_DAILY_PLANNER_PARENT_ID}\n\
         \n\
         # Job selection\n\
         MAX_FEATURE_JOBS={DEFAULT_MAX_FEATURE_JOBS}\n\
         JOB_KEYWORDS_RESEARCH={}\n\
         JOB_KEYWORDS_AI_ML={}\n\
         JOB_KEYWORDS_INTERNSHIP={}\n\
         JOB_KEYWORDS_ENGINEER={}\n\
         \n\
         # Notion API pacing\n\
         NOTION_RATE_LIMIT={DEFAULT_RATE_LIMIT_SECS}\n\
         MAX_RETRIES={DEFAULT_MAX_RETRIES}\n\
         RETRY_DELAY={DEFAULT_RETRY_DELAY_SECS:.1}\n\
         \n\
         LOG_LEVEL={DEFAULT_LOG_FILTER}\n",
        defaults.research.join(","),
        defaults.ai_ml.join(","),
        defaults.internship.join(","),
        defaults.engineer.join(","),
    )
}

/// Write [`sample_env`] to `path`. Refuses to overwrite unless `force` is set.
pub fn write_sample_env(path: &Path, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to overwrite)", path.display()),
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, sample_env())
}
