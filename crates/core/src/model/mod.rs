mod feedback;
mod ids;
mod question;
mod session;

pub use ids::{ParseIdError, QuestionId, SessionId};

pub use feedback::{Feedback, FeedbackError, Score};
pub use question::{DEFAULT_TIME_LIMIT_SECS, Difficulty, Question, QuestionError};
pub use session::{
    AnsweredQuestion, SessionState, SessionSummary, SessionSummaryError, SubmissionTrigger,
};
