//! Shared error types for the services crate.

use thiserror::Error;

use gateway::GatewayError;
use interview_core::model::{SessionState, SessionSummaryError};

/// Errors emitted by interview session services.
///
/// `Fetch`, `Submission` and `CompletionReport` wrap collaborator failures; the
/// remaining variants are rejections that leave the session untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("failed to load questions: {0}")]
    Fetch(GatewayError),
    #[error("failed to submit answer: {0}")]
    Submission(GatewayError),
    #[error("failed to report completion: {0}")]
    CompletionReport(GatewayError),
    #[error("an answer is already being evaluated")]
    SubmissionPending,
    #[error("answer cannot be empty")]
    EmptyAnswer,
    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },
    #[error("session already completed")]
    Completed,
    #[error("submission result does not match the pending submission")]
    StaleSubmission,
    #[error("session runner has stopped")]
    RunnerStopped,
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
