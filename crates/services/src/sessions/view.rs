use std::sync::Arc;

use interview_core::model::{Feedback, Question, SessionId, SessionState};

use super::progress::SessionProgress;

/// Read-only picture of a session handed to the host after every change.
///
/// Questions are shared with the session, not copied.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub state: SessionState,
    pub index: usize,
    pub questions: Arc<[Question]>,
    pub feedback: Option<Feedback>,
    pub remaining_secs: u32,
    pub countdown_running: bool,
    pub submission_pending: bool,
    pub answer: String,
    pub error: Option<String>,
    pub progress: SessionProgress,
}

impl SessionSnapshot {
    /// The current question, if the session has one.
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        match self.state {
            SessionState::AwaitingAnswer
            | SessionState::Evaluating
            | SessionState::ReviewingFeedback => self.questions.get(self.index),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.index + 1 == self.questions.len()
    }
}
