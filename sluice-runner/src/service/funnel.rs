//! Error funnel
//!
//! Last stop for failures caught at the top of the poll loop: whatever the
//! failure carries is flattened into one structured log line tagged with
//! the worker's task type.

use tracing::error;

use crate::error::RunnerError;

pub struct ErrorFunnel {
    task_type: String,
}

impl ErrorFunnel {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
        }
    }

    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// Logs `err`; absent message or trace are logged as empty strings
    pub fn report(&self, err: &RunnerError) {
        let diagnostics = err.diagnostics();
        error!(
            task_type = %self.task_type,
            error_message = %diagnostics.message,
            error_trace = %diagnostics.trace,
            "Error for {}",
            self.task_type
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerError;
    use sluice_client::ClientError;

    #[test]
    fn test_report_tolerates_missing_fields() {
        let funnel = ErrorFunnel::new("encode");
        assert_eq!(funnel.task_type(), "encode");

        funnel.report(&RunnerError::Execute(WorkerError::empty()));
        funnel.report(&RunnerError::Poll(ClientError::ParseError(String::new())));
        funnel.report(&RunnerError::AlreadyRunning {
            task_type: "encode".to_string(),
        });
    }
}
