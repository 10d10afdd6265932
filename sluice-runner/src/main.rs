//! Sluice Runner
//!
//! Polls the queue service for tasks of the configured types and executes
//! them with the built-in workers until interrupted.
//!
//! Startup:
//! - Configuration: load settings from environment or defaults
//! - Client: HTTP connection to the queue service
//! - Workers: resolve configured task types to built-in workers
//! - Manager: one poll loop per worker, stopped on Ctrl-C

mod builtin;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sluice_client::QueueClient;
use sluice_runner::{RunnerConfig, RunnerError, Task, TaskManager, TaskRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sluice_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sluice Runner");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: worker_id={}, queue_url={}, domain={:?}",
        config.worker_id, config.queue_url, config.domain
    );

    let repository: Arc<dyn TaskRepository> = Arc::new(QueueClient::new(config.queue_url.clone()));

    let workers = builtin::resolve(&config.task_types).context("Failed to resolve workers")?;
    for worker in &workers {
        info!("  - {}", worker.task_def_name());
    }

    let error_handler = Arc::new(|error: &RunnerError, task: Option<&Task>| {
        if let Some(task) = task {
            warn!(task_id = %task.task_id, "Task failure observed: {}", error);
        }
    });

    let manager = TaskManager::new(repository, workers, config.runner_options(), error_handler)
        .context("Failed to create task runners")?;

    info!("Poll interval: {:?}", config.poll_interval);
    manager
        .start_polling()
        .context("Failed to start task runners")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown requested, waiting for in-flight tasks");
    manager.stop_polling();
    manager.join().await;

    info!("Sluice Runner stopped");
    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<RunnerConfig> {
    match RunnerConfig::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(e) => {
            info!("Failed to load config from environment ({}), using defaults", e);
            let config = RunnerConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
