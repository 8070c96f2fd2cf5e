use crate::store::Action;

#[derive(Debug, Clone)]
pub enum BrowserAction {
    SetOrigin { origin: String },
    SetUserAgent { user_agent: String },
}

impl Action for BrowserAction {
    fn type_name(&self) -> &'static str {
        match self {
            BrowserAction::SetOrigin { .. } => "app-ducks/browser/SET_ORIGIN",
            BrowserAction::SetUserAgent { .. } => "app-ducks/browser/SET_USER_AGENT",
        }
    }
}
