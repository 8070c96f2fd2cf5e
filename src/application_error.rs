//! Application-level error code, e.g. the status of the rendered page.

use serde::{Deserialize, Serialize};

use crate::error_reporting::{ErrorReporter, ReportError, ReportedError};
use crate::store::{Action, DuckState, Reducer, Store};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationErrorState {
    pub code: Option<u16>,
}

impl DuckState for ApplicationErrorState {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationErrorAction {
    ApplicationError { code: u16 },
    ClearError,
}

impl Action for ApplicationErrorAction {
    fn type_name(&self) -> &'static str {
        match self {
            ApplicationErrorAction::ApplicationError { .. } => "app-ducks/error/APPLICATION_ERROR",
            ApplicationErrorAction::ClearError => "app-ducks/error/CLEAR_ERROR",
        }
    }
}

pub struct ApplicationErrorReducer;

impl Reducer for ApplicationErrorReducer {
    type State = ApplicationErrorState;
    type Action = ApplicationErrorAction;

    fn reduce(_state: Self::State, action: Self::Action) -> Self::State {
        match action {
            ApplicationErrorAction::ApplicationError { code } => ApplicationErrorState { code: Some(code) },
            ApplicationErrorAction::ClearError => ApplicationErrorState::default(),
        }
    }
}

/// Record an error code and report the error that caused it.
pub async fn application_error(
    store: &Store<ApplicationErrorReducer>,
    reporter: &ErrorReporter,
    code: u16,
    error: Option<ReportedError>,
) -> Result<Option<String>, ReportError> {
    store.dispatch(ApplicationErrorAction::ApplicationError { code });
    let other_data = serde_json::json!({ "code": code });
    reporter.add_error_to_report(error, Some(other_data)).await
}
