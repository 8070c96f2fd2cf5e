//! Redirect requests raised while rendering.

use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::store::{Action, DuckState, Reducer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RedirectionState {
    /// Where the server should redirect; the first destination wins.
    pub destination: Option<String>,
    pub redirection_in_flight: bool,
}

impl DuckState for RedirectionState {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectionAction {
    ServerSideRedirect { destination: String },
    /// The host navigates the window to `destination`.
    ClientSideRedirect { destination: String },
    Noop,
}

impl Action for RedirectionAction {
    fn type_name(&self) -> &'static str {
        match self {
            RedirectionAction::ServerSideRedirect { .. } => "app-ducks/redirection/SERVER_SIDE_REDIRECT",
            RedirectionAction::ClientSideRedirect { .. } => "app-ducks/redirection/CLIENT_SIDE_REDIRECT",
            RedirectionAction::Noop => "app-ducks/redirection/NOOP",
        }
    }
}

pub struct RedirectionReducer;

impl Reducer for RedirectionReducer {
    type State = RedirectionState;
    type Action = RedirectionAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            RedirectionAction::ServerSideRedirect { destination } => {
                if state.destination.is_none() {
                    state.destination = Some(destination);
                }
            }
            RedirectionAction::ClientSideRedirect { .. } => state.redirection_in_flight = true,
            RedirectionAction::Noop => {}
        }
        state
    }
}

/// Build the redirect action for the current runtime.
pub fn external_redirect(env: &Environment, destination: Option<&str>) -> RedirectionAction {
    let Some(destination) = destination else {
        return RedirectionAction::Noop;
    };
    let destination = destination.to_string();
    if env.is_browser() {
        RedirectionAction::ClientSideRedirect { destination }
    } else {
        RedirectionAction::ServerSideRedirect { destination }
    }
}
