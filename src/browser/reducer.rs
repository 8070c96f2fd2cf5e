use super::action::BrowserAction;
use super::state::BrowserState;
use crate::store::Reducer;

pub struct BrowserReducer;

impl Reducer for BrowserReducer {
    type State = BrowserState;
    type Action = BrowserAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            BrowserAction::SetOrigin { origin } => state.location.origin = Some(origin),
            BrowserAction::SetUserAgent { user_agent } => state.user_agent = Some(user_agent),
        }
        state
    }
}
