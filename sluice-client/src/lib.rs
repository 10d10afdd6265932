//! Sluice HTTP Client
//!
//! A small, type-safe HTTP client for the task queue service.
//!
//! The runner only needs two endpoints: polling for a task of a given type
//! and reporting the result of a task back.
//!
//! # Example
//!
//! ```no_run
//! use sluice_client::QueueClient;
//!
//! #[tokio::main]
//! async fn main() -> sluice_client::Result<()> {
//!     let client = QueueClient::new("http://localhost:8080");
//!
//!     if let Some(task) = client.poll_task("encode", "worker-1", None).await? {
//!         println!("Polled task: {}", task.task_id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod tasks;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use sluice_core::domain::task::{Task, TaskResult};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the task queue API
#[derive(Debug, Clone)]
pub struct QueueClient {
    /// Base URL of the queue service (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl QueueClient {
    /// Create a new queue client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the queue API (e.g., "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new queue client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use sluice_client::QueueClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = QueueClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the queue service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response whose body may legitimately be absent
    ///
    /// `204 No Content` and an empty body both map to `None`.
    async fn handle_optional_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
