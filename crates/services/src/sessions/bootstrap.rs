use std::sync::Arc;

use gateway::QuestionSource;
use interview_core::model::{Question, SessionId};
use log::{debug, info};

use crate::error::SessionError;

/// What a successful question fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// At least one question, in the order served.
    Ready(Vec<Question>),
    /// The session exists but has nothing to ask.
    Empty,
}

/// Loads the question list that starts a session.
#[derive(Clone)]
pub struct SessionBootstrapper {
    questions: Arc<dyn QuestionSource>,
}

impl SessionBootstrapper {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionSource>) -> Self {
        Self { questions }
    }

    /// Fetch the questions of `session_id`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` if the question source fails.
    pub async fn load(&self, session_id: SessionId) -> Result<BootstrapOutcome, SessionError> {
        debug!("loading questions for session {session_id}");
        let questions = self
            .questions
            .fetch_questions(session_id)
            .await
            .map_err(SessionError::Fetch)?;

        if questions.is_empty() {
            info!("session {session_id} has no questions");
            return Ok(BootstrapOutcome::Empty);
        }
        info!("session {session_id}: loaded {} questions", questions.len());
        Ok(BootstrapOutcome::Ready(questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::{GatewayError, InMemoryGateway};
    use interview_core::model::{Difficulty, QuestionId};

    #[tokio::test]
    async fn empty_list_is_reported_as_empty() {
        let memory = InMemoryGateway::new();
        memory.insert_questions(SessionId::new(1), Vec::new()).unwrap();
        let bootstrapper = SessionBootstrapper::new(Arc::new(memory));

        let outcome = bootstrapper.load(SessionId::new(1)).await.unwrap();
        assert_eq!(outcome, BootstrapOutcome::Empty);
    }

    #[tokio::test]
    async fn questions_keep_source_order() {
        let memory = InMemoryGateway::new();
        let questions: Vec<Question> = [5, 2, 9]
            .into_iter()
            .map(|id| {
                Question::new(QuestionId::new(id), "prompt", "", Difficulty::Easy, 30).unwrap()
            })
            .collect();
        memory.insert_questions(SessionId::new(4), questions.clone()).unwrap();
        let bootstrapper = SessionBootstrapper::new(Arc::new(memory));

        let outcome = bootstrapper.load(SessionId::new(4)).await.unwrap();
        assert_eq!(outcome, BootstrapOutcome::Ready(questions));
    }

    #[tokio::test]
    async fn source_failure_becomes_fetch_error() {
        let bootstrapper = SessionBootstrapper::new(Arc::new(InMemoryGateway::new()));

        let err = bootstrapper.load(SessionId::new(8)).await.unwrap_err();
        assert!(matches!(err, SessionError::Fetch(GatewayError::NotFound)));
    }
}
