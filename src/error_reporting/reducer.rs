use std::time::Duration;

use tracing::warn;

use super::action::ErrorReportingAction;
use super::state::{ErrorReport, ErrorReportingState, DEFAULT_RETRY_WAIT, MAX_RETRY_WAIT};
use crate::store::Reducer;

pub struct ErrorReportingReducer;

impl Reducer for ErrorReportingReducer {
    type State = ErrorReportingState;
    type Action = ErrorReportingAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            ErrorReportingAction::AddErrorReportToQueue {
                error,
                other_data,
                href,
            } => {
                if error.is_none() && other_data.is_none() {
                    warn!("No error or other data given to report, ignoring");
                    return state;
                }
                state
                    .queue
                    .push(ErrorReport::format(error.as_ref(), other_data, href));
            }
            ErrorReportingAction::SendErrorReportRequest { .. } => {
                state.pending = std::mem::take(&mut state.queue);
                state.pending_in_flight = true;
            }
            ErrorReportingAction::SendErrorReportSuccess => {
                state.retry_wait = DEFAULT_RETRY_WAIT;
                state.pending.clear();
                state.pending_in_flight = false;
            }
            ErrorReportingAction::SendErrorReportFailure => {
                let pending = std::mem::take(&mut state.pending);
                state.queue.extend(pending);
                state.pending_in_flight = false;
            }
            ErrorReportingAction::ScheduleErrorReport { jitter } => {
                state.pending_in_flight = true;
                state.retry_wait = next_retry_wait(state.retry_wait, jitter);
            }
        }
        state
    }
}

/// Grow the wait by `1.25 + jitter`, truncated to whole milliseconds.
fn next_retry_wait(current: Duration, jitter: f64) -> Duration {
    let factor = 1.25 + jitter.clamp(0.0, 1.0 / 3.0);
    let millis = (current.as_millis() as f64 * factor) as u64;
    Duration::from_millis(millis).min(MAX_RETRY_WAIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_reporting::ReportedError;

    fn add(message: &str) -> ErrorReportingAction {
        ErrorReportingAction::AddErrorReportToQueue {
            error: Some(ReportedError::new(message)),
            other_data: None,
            href: None,
        }
    }

    #[test]
    fn test_add_without_error_or_data_is_ignored() {
        let state = ErrorReportingReducer::reduce(
            ErrorReportingState::default(),
            ErrorReportingAction::AddErrorReportToQueue {
                error: None,
                other_data: None,
                href: None,
            },
        );
        assert!(state.queue.is_empty());
    }

    #[test]
    fn test_other_data_alone_is_queued() {
        let state = ErrorReportingReducer::reduce(
            ErrorReportingState::default(),
            ErrorReportingAction::AddErrorReportToQueue {
                error: None,
                other_data: Some(serde_json::json!({"step": "checkout"})),
                href: None,
            },
        );
        assert_eq!(state.queue.len(), 1);
        assert!(state.queue[0].msg.is_none());
    }

    #[test]
    fn test_failure_returns_pending_to_queue() {
        let state = ErrorReportingReducer::reduce(ErrorReportingState::default(), add("first"));
        let state = ErrorReportingReducer::reduce(
            state,
            ErrorReportingAction::SendErrorReportRequest {
                payload: "[]".to_string(),
            },
        );
        assert!(state.queue.is_empty());
        assert_eq!(state.pending.len(), 1);

        let state = ErrorReportingReducer::reduce(state, add("second"));
        let state = ErrorReportingReducer::reduce(state, ErrorReportingAction::SendErrorReportFailure);
        let messages: Vec<_> = state.queue.iter().filter_map(|r| r.msg.as_deref()).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert!(state.pending.is_empty());
        assert!(!state.pending_in_flight);
    }

    #[test]
    fn test_retry_wait_grows_caps_and_resets() {
        let mut state = ErrorReportingState::default();
        state = ErrorReportingReducer::reduce(state, ErrorReportingAction::ScheduleErrorReport { jitter: 0.0 });
        assert_eq!(state.retry_wait, Duration::from_millis(625));

        for _ in 0..50 {
            state = ErrorReportingReducer::reduce(state, ErrorReportingAction::ScheduleErrorReport { jitter: 0.3 });
        }
        assert_eq!(state.retry_wait, MAX_RETRY_WAIT);

        state = ErrorReportingReducer::reduce(state, ErrorReportingAction::SendErrorReportSuccess);
        assert_eq!(state.retry_wait, DEFAULT_RETRY_WAIT);
    }
}
