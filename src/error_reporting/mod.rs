//! Queued error reports and their delivery with backoff.

mod action;
mod reducer;
mod reporter;
mod state;

pub use action::ErrorReportingAction;
pub use reducer::ErrorReportingReducer;
pub use reporter::{ErrorReporter, ReportError};
pub use state::{
    ErrorReport, ErrorReportingState, ReportedError, DEFAULT_RETRY_WAIT, MAX_RETRY_WAIT,
};
