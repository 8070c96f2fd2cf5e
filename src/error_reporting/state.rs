use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::DuckState;

/// Wait before retrying a failed send, and the minimum gap between sends.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(500);

/// Upper bound for the growing retry wait.
pub const MAX_RETRY_WAIT: Duration = Duration::from_secs(10);

/// Error details captured for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedError {
    pub message: String,
    /// Source chain, outermost first.
    pub stack: Option<String>,
}

impl ReportedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    /// Capture an error and its chain of sources.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

/// One report as posted to the reporting endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub msg: Option<String>,
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub other_data: Option<serde_json::Value>,
}

impl ErrorReport {
    pub fn format(
        error: Option<&ReportedError>,
        other_data: Option<serde_json::Value>,
        href: Option<String>,
    ) -> Self {
        Self {
            msg: error.map(|e| e.message.clone()),
            stack: error.and_then(|e| e.stack.clone()),
            href,
            other_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReportingState {
    /// Reports waiting for the next send.
    pub queue: Vec<ErrorReport>,
    /// Reports in the send currently in flight.
    pub pending: Vec<ErrorReport>,
    /// A send or a scheduled retry is outstanding.
    pub pending_in_flight: bool,
    pub retry_wait: Duration,
}

impl Default for ErrorReportingState {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            pending: Vec::new(),
            pending_in_flight: false,
            retry_wait: DEFAULT_RETRY_WAIT,
        }
    }
}

impl DuckState for ErrorReportingState {}
