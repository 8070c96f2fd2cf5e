use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::action::ErrorReportingAction;
use super::reducer::ErrorReportingReducer;
use super::state::{ErrorReport, ReportedError, DEFAULT_RETRY_WAIT};
use crate::config::ConfigStore;
use crate::env::Environment;
use crate::fetch::{FetchClient, FetchError, FetchRequest};
use crate::store::Store;

/// Errors delivering a batch of reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No reporting URL configured")]
    MissingReportingUrl,

    #[error("Reporting endpoint rejected reports: {status} {status_text}")]
    Rejected { status: u16, status_text: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to serialize reports: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Sends queued error reports: posted to the reporting endpoint in the
/// browser, written to the log on the server.
#[derive(Clone)]
pub struct ErrorReporter {
    store: Store<ErrorReportingReducer>,
    env: Environment,
    fetch: Arc<dyn FetchClient>,
    config: ConfigStore,
    href: Option<String>,
    /// Held for the duration of a send; later sends queue behind it.
    sending: Arc<tokio::sync::Mutex<()>>,
}

impl ErrorReporter {
    pub fn new(
        store: Store<ErrorReportingReducer>,
        env: Environment,
        fetch: Arc<dyn FetchClient>,
        config: ConfigStore,
    ) -> Self {
        Self {
            store,
            env,
            fetch,
            config,
            href: None,
            sending: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Page URL attached to reports queued from now on.
    pub fn with_href(mut self, href: Option<String>) -> Self {
        self.href = href;
        self
    }

    pub fn store(&self) -> &Store<ErrorReportingReducer> {
        &self.store
    }

    /// Queue a report and send the queue.
    pub async fn add_error_to_report(
        &self,
        error: Option<ReportedError>,
        other_data: Option<serde_json::Value>,
    ) -> Result<Option<String>, ReportError> {
        self.store.dispatch(ErrorReportingAction::AddErrorReportToQueue {
            error,
            other_data,
            href: self.href.clone(),
        });
        self.send_error_report().await
    }

    /// Send everything queued. Returns the endpoint's response body, or
    /// `None` when the queue was empty.
    ///
    /// A send waits for the one in flight, and sends are spaced at least
    /// [`DEFAULT_RETRY_WAIT`] apart. A failed send puts its reports back in
    /// the queue and schedules a retry after the current retry wait.
    pub async fn send_error_report(&self) -> Result<Option<String>, ReportError> {
        let _sending = self.sending.lock().await;

        // the batch sent must be exactly the batch moved to `pending`
        let batch = self.store.reduce_with(|s| {
            if s.queue.is_empty() {
                return (Ok(None), None);
            }
            match serde_json::to_string(&s.queue) {
                Ok(payload) => (
                    Ok(Some((s.queue.clone(), payload.clone()))),
                    Some(ErrorReportingAction::SendErrorReportRequest { payload }),
                ),
                Err(err) => (Err(err), None),
            }
        });
        let Some((queue, payload)) = batch? else {
            return Ok(None);
        };

        let (result, ()) = tokio::join!(
            self.deliver(&queue, payload),
            tokio::time::sleep(DEFAULT_RETRY_WAIT)
        );

        match result {
            Ok(body) => {
                debug!(reports = queue.len(), "Error reports sent");
                self.store.dispatch(ErrorReportingAction::SendErrorReportSuccess);
                Ok(Some(body))
            }
            Err(err) => {
                let wait = self.store.select(|s| s.retry_wait);
                warn!(error = %err, retry_in_ms = wait.as_millis() as u64, "Failed to send error reports");
                self.store.dispatch(ErrorReportingAction::SendErrorReportFailure);
                self.store.dispatch(ErrorReportingAction::ScheduleErrorReport { jitter: jitter() });
                self.schedule_retry(wait);
                Err(err)
            }
        }
    }

    async fn deliver(&self, queue: &[ErrorReport], payload: String) -> Result<String, ReportError> {
        if self.env.is_server() {
            for report in queue {
                error!(
                    msg = report.msg.as_deref().unwrap_or_default(),
                    stack = report.stack.as_deref().unwrap_or_default(),
                    other_data = ?report.other_data,
                    "Server side error"
                );
            }
            return Ok(r#"{"thankYou":true}"#.to_string());
        }

        let url = self
            .config
            .read(|c| c.reporting.reporting_url.clone())
            .ok_or(ReportError::MissingReportingUrl)?;
        let response = self.fetch.fetch(FetchRequest::post_json(url, payload)).await?;
        if response.ok() {
            Ok(response.body)
        } else {
            Err(ReportError::Rejected {
                status: response.status,
                status_text: response.status_text,
            })
        }
    }

    fn schedule_retry(&self, wait: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let reporter = self.clone();
        let retry: BoxFuture<'static, ()> = Box::pin(async move {
            tokio::time::sleep(wait).await;
            if let Err(err) = reporter.send_error_report().await {
                debug!(error = %err, "Error report retry failed");
            }
        });
        handle.spawn(retry);
    }
}

/// Random value in `[0, 1/3)`.
fn jitter() -> f64 {
    fastrand::f64() / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_range() {
        for _ in 0..100 {
            let j = jitter();
            assert!((0.0..1.0 / 3.0).contains(&j));
        }
    }

    #[test]
    fn test_jitter_not_serially_correlated() {
        let samples: Vec<f64> = (0..1000).map(|_| jitter()).collect();
        let close = samples
            .windows(2)
            .filter(|pair| (pair[0] - pair[1]).abs() < 0.001)
            .count();
        // independent uniform draws land this close well under 1% of the time
        assert!(close < 50, "{close} of 999 consecutive draws within 0.001");
    }
}
