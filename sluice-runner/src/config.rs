//! Runner configuration
//!
//! [`RunnerOptions`] is the per-runner configuration handed to every
//! [`TaskRunner`](crate::TaskRunner). [`RunnerConfig`] is the process-level
//! configuration the binary loads from the environment.

use std::time::Duration;

/// Default pause between two poll cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Per-runner options
///
/// Immutable once the runner is built.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// How long to sleep after each poll cycle
    pub poll_interval: Duration,

    /// Routing domain to poll in, if any
    pub domain: Option<String>,

    /// Identifier reported to the queue with every poll
    pub worker_id: String,
}

impl RunnerOptions {
    /// Creates options for the given worker id with default interval and no domain
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            domain: None,
            worker_id: worker_id.into(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Process configuration for the runner binary
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Queue service base URL (e.g., "http://localhost:8080")
    pub queue_url: String,

    /// Identifier this process reports when polling
    pub worker_id: String,

    /// How often each runner polls the queue
    pub poll_interval: Duration,

    /// Routing domain, if tasks are partitioned
    pub domain: Option<String>,

    /// Names of the task types to run workers for
    pub task_types: Vec<String>,
}

impl RunnerConfig {
    /// Creates a new configuration with defaults
    pub fn new(queue_url: String) -> Self {
        Self {
            queue_url,
            worker_id: uuid::Uuid::new_v4().to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            domain: None,
            task_types: vec!["echo".to_string()],
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - QUEUE_URL (required)
    /// - WORKER_ID (optional, default: random UUID)
    /// - POLL_INTERVAL_MS (optional, milliseconds, default: 1000)
    /// - TASK_DOMAIN (optional)
    /// - TASK_TYPES (optional, comma-separated, default: "echo")
    pub fn from_env() -> anyhow::Result<Self> {
        let queue_url = std::env::var("QUEUE_URL")
            .map_err(|_| anyhow::anyhow!("QUEUE_URL environment variable not set"))?;

        let mut config = Self::new(queue_url);

        if let Ok(worker_id) = std::env::var("WORKER_ID") {
            config.worker_id = worker_id;
        }

        if let Some(poll_interval) = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
        {
            config.poll_interval = poll_interval;
        }

        config.domain = std::env::var("TASK_DOMAIN")
            .ok()
            .filter(|domain| !domain.is_empty());

        if let Ok(task_types) = std::env::var("TASK_TYPES") {
            config.task_types = parse_task_types(&task_types);
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.worker_id.is_empty() {
            anyhow::bail!("worker_id cannot be empty");
        }

        if self.queue_url.is_empty() {
            anyhow::bail!("queue_url cannot be empty");
        }

        if !self.queue_url.starts_with("http://") && !self.queue_url.starts_with("https://") {
            anyhow::bail!("queue_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.task_types.is_empty() {
            anyhow::bail!("at least one task type must be configured");
        }

        Ok(())
    }

    /// Options shared by every runner this process starts
    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            poll_interval: self.poll_interval,
            domain: self.domain.clone(),
            worker_id: self.worker_id.clone(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080".to_string())
    }
}

fn parse_task_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
