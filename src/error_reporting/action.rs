use super::state::ReportedError;
use crate::store::Action;

#[derive(Debug, Clone)]
pub enum ErrorReportingAction {
    AddErrorReportToQueue {
        error: Option<ReportedError>,
        other_data: Option<serde_json::Value>,
        href: Option<String>,
    },
    SendErrorReportRequest {
        /// JSON array being sent.
        payload: String,
    },
    SendErrorReportSuccess,
    SendErrorReportFailure,
    ScheduleErrorReport {
        /// Random extra growth in `[0, 1/3)`.
        jitter: f64,
    },
}

impl Action for ErrorReportingAction {
    fn type_name(&self) -> &'static str {
        match self {
            ErrorReportingAction::AddErrorReportToQueue { .. } => {
                "app-ducks/error-reporting/ADD_ERROR_REPORT_TO_QUEUE"
            }
            ErrorReportingAction::SendErrorReportRequest { .. } => {
                "app-ducks/error-reporting/SEND_ERROR_REPORT_REQUEST"
            }
            ErrorReportingAction::SendErrorReportSuccess => {
                "app-ducks/error-reporting/SEND_ERROR_REPORT_SUCCESS"
            }
            ErrorReportingAction::SendErrorReportFailure => {
                "app-ducks/error-reporting/SEND_ERROR_REPORT_FAILURE"
            }
            ErrorReportingAction::ScheduleErrorReport { .. } => {
                "app-ducks/error-reporting/SCHEDULE_ERROR_REPORT"
            }
        }
    }
}
