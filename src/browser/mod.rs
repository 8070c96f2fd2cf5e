//! Cookies, user agent and origin of the current page.

mod action;
mod reducer;
mod state;

pub use action::BrowserAction;
pub use reducer::BrowserReducer;
pub use state::{BrowserLocation, BrowserState};
