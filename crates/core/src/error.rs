use thiserror::Error;

use crate::model::{FeedbackError, QuestionError, SessionSummaryError};

/// Any domain validation failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
