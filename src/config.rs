//! Runtime configuration.
//!
//! Everything has a default except the repository coordinates. [`Config::from_env`] reads the
//! `SCHEDULER_*` environment variables; callers that load a `.env` file do so before calling it.

use std::time::Duration;

use crate::{error::ConfigError, service::ConflictPolicy};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_DATA_PATH: &str = "data.json";
const DEFAULT_DATA_BRANCH: &str = "data";
const DEFAULT_USER_AGENT: &str = concat!("alliance-scheduler/", env!("CARGO_PKG_VERSION"));

/// Location of the document in the contents API.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Base URL of the API, without trailing slash.
    pub api_url: String,
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Path of the JSON document inside the repository.
    pub path: String,
    /// Branch holding the document. `None` uses the repository's default branch.
    pub branch: Option<String>,
}

impl RepositoryConfig {
    /// Repository `owner/name` with default API URL, path, and branch.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: owner.into(),
            name: name.into(),
            path: DEFAULT_DATA_PATH.to_string(),
            branch: Some(DEFAULT_DATA_BRANCH.to_string()),
        }
    }

    /// URL of the document in the contents API.
    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.name,
            self.path
        )
    }
}

/// Retry policy settings.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Attempts before giving up, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure; doubled after each further failure.
    pub initial_backoff: Duration,
    /// Upper bound for a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1000),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// Write queue settings.
#[derive(Debug, Clone, Copy)]
pub struct WriteQueueConfig {
    /// Pause after each job before the next one starts, to stay under rate limits.
    pub inter_job_delay: Duration,
}

impl Default for WriteQueueConfig {
    fn default() -> Self {
        Self {
            inter_job_delay: Duration::from_millis(100),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the document lives.
    pub repository: RepositoryConfig,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Credential used for registration submissions when no officer is signed in.
    pub registration_token: Option<String>,
    /// Retry policy for each fetch and write.
    pub retry: RetryConfig,
    /// Pacing of the write queue.
    pub queue: WriteQueueConfig,
    /// Age after which the cached document is refetched on read.
    pub cache_max_age: Duration,
    /// Behavior when a write loses the optimistic race.
    pub conflict_policy: ConflictPolicy,
}

impl Config {
    /// Configuration for `owner/name` with defaults everywhere else.
    pub fn new(repository: RepositoryConfig) -> Self {
        Self {
            repository,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            registration_token: None,
            retry: RetryConfig::default(),
            queue: WriteQueueConfig::default(),
            cache_max_age: Duration::from_secs(60),
            conflict_policy: ConflictPolicy::default(),
        }
    }

    /// Load configuration from `SCHEDULER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };
        let millis = |key: &str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(key) {
                Some(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|e| {
                    ConfigError::InvalidEnvValue {
                        var: key.to_string(),
                        reason: e.to_string(),
                    }
                }),
                None => Ok(default),
            }
        };

        let mut repository = RepositoryConfig::new(
            required("SCHEDULER_REPO_OWNER")?,
            required("SCHEDULER_REPO_NAME")?,
        );
        if let Some(api_url) = lookup("SCHEDULER_API_URL") {
            repository.api_url = api_url;
        }
        if let Some(path) = lookup("SCHEDULER_DATA_PATH") {
            repository.path = path;
        }
        if let Some(branch) = lookup("SCHEDULER_DATA_BRANCH") {
            repository.branch = Some(branch).filter(|b| !b.is_empty());
        }

        let mut config = Config::new(repository);
        if let Some(user_agent) = lookup("SCHEDULER_USER_AGENT") {
            config.user_agent = user_agent;
        }
        config.registration_token =
            lookup("SCHEDULER_REGISTRATION_TOKEN").filter(|t| !t.trim().is_empty());

        if let Some(raw) = lookup("SCHEDULER_MAX_ATTEMPTS") {
            config.retry.max_attempts = match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidEnvValue {
                        var: "SCHEDULER_MAX_ATTEMPTS".to_string(),
                        reason: format!("expected a positive integer, got {:?}", raw),
                    })
                }
            };
        }
        config.retry.initial_backoff =
            millis("SCHEDULER_BACKOFF_MS", config.retry.initial_backoff)?;
        config.retry.attempt_timeout =
            millis("SCHEDULER_ATTEMPT_TIMEOUT_MS", config.retry.attempt_timeout)?;
        config.queue.inter_job_delay =
            millis("SCHEDULER_QUEUE_DELAY_MS", config.queue.inter_job_delay)?;
        config.cache_max_age = millis("SCHEDULER_CACHE_MAX_AGE_MS", config.cache_max_age)?;

        Ok(config)
    }
}
