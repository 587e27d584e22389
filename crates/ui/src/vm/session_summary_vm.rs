use interview_core::model::SessionSummary;

use crate::vm::time_fmt::{format_datetime, format_duration};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummaryVm {
    pub session_id: u64,
    pub started_at_str: String,
    pub completed_at_str: String,
    pub duration_str: String,
    pub answered: u32,
    pub auto_submitted: u32,
    pub average_score_str: String,
}

impl From<&SessionSummary> for SessionSummaryVm {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            session_id: summary.session_id().value(),
            started_at_str: format_datetime(summary.started_at()),
            completed_at_str: format_datetime(summary.completed_at()),
            duration_str: format_duration(summary.started_at(), summary.completed_at()),
            answered: summary.answered(),
            auto_submitted: summary.auto_submitted(),
            average_score_str: summary
                .average_score()
                .map_or_else(|| "n/a".to_string(), |avg| format!("{avg:.1}/100")),
        }
    }
}

#[must_use]
pub fn map_session_summary(summary: &SessionSummary) -> SessionSummaryVm {
    SessionSummaryVm::from(summary)
}
