use async_trait::async_trait;
use interview_core::model::{Feedback, Question, QuestionId, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by collaborator adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error(transparent)]
    Invalid(#[from] interview_core::Error),
}

/// Loads the ordered question list of a session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every question of the session, in the order they must be asked.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` for transport, authorization, or payload failures.
    async fn fetch_questions(&self, session_id: SessionId) -> Result<Vec<Question>, GatewayError>;
}

/// Scores one answer.
#[async_trait]
pub trait AnswerScorer: Send + Sync {
    /// Submit `answer` for `question_id` and return the scoring feedback.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` for transport or validation failures.
    async fn submit_answer(
        &self,
        question_id: QuestionId,
        answer: &str,
    ) -> Result<Feedback, GatewayError>;
}

/// Marks a session as finished upstream.
#[async_trait]
pub trait CompletionReporter: Send + Sync {
    /// # Errors
    ///
    /// Returns `GatewayError` if the acknowledgement cannot be obtained.
    async fn complete_session(&self, session_id: SessionId) -> Result<(), GatewayError>;
}

/// The three collaborators an interview session talks to.
#[derive(Clone)]
pub struct Gateway {
    pub questions: Arc<dyn QuestionSource>,
    pub scorer: Arc<dyn AnswerScorer>,
    pub reporter: Arc<dyn CompletionReporter>,
}

impl Gateway {
    /// Use one adapter for all three roles.
    #[must_use]
    pub fn from_adapter<T>(adapter: T) -> Self
    where
        T: QuestionSource + AnswerScorer + CompletionReporter + 'static,
    {
        let adapter = Arc::new(adapter);
        let questions: Arc<dyn QuestionSource> = adapter.clone();
        let scorer: Arc<dyn AnswerScorer> = adapter.clone();
        let reporter: Arc<dyn CompletionReporter> = adapter;
        Self {
            questions,
            scorer,
            reporter,
        }
    }

    #[must_use]
    pub fn in_memory(gateway: InMemoryGateway) -> Self {
        Self::from_adapter(gateway)
    }
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct InMemoryState {
    questions: HashMap<SessionId, Vec<Question>>,
    feedback: HashMap<QuestionId, Feedback>,
    default_feedback: Option<Feedback>,
    fetch_failure: Option<String>,
    submit_failures: u32,
    completion_failure: Option<String>,
    fetch_calls: u32,
    submissions: Vec<(QuestionId, String)>,
    completions: Vec<SessionId>,
}

/// Scripted in-memory collaborators for prototyping and tests.
///
/// Clones share state, so a test can keep a handle and inspect recorded calls
/// after handing a clone to the session.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<Mutex<InMemoryState>>,
    latency: Option<Duration>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every submission by `latency` (uses tokio time, so paused clocks apply).
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, InMemoryState>, GatewayError> {
        self.state
            .lock()
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn insert_questions(
        &self,
        session_id: SessionId,
        questions: Vec<Question>,
    ) -> Result<(), GatewayError> {
        self.lock()?.questions.insert(session_id, questions);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn set_feedback(&self, question_id: QuestionId, feedback: Feedback) -> Result<(), GatewayError> {
        self.lock()?.feedback.insert(question_id, feedback);
        Ok(())
    }

    /// Feedback returned for questions without a scripted entry.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn set_default_feedback(&self, feedback: Feedback) -> Result<(), GatewayError> {
        self.lock()?.default_feedback = Some(feedback);
        Ok(())
    }

    /// Make every fetch fail with `message` until cleared with `None`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn set_fetch_failure(&self, message: Option<&str>) -> Result<(), GatewayError> {
        self.lock()?.fetch_failure = message.map(str::to_string);
        Ok(())
    }

    /// Fail the next `count` submissions.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn fail_next_submissions(&self, count: u32) -> Result<(), GatewayError> {
        self.lock()?.submit_failures = count;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn set_completion_failure(&self, message: Option<&str>) -> Result<(), GatewayError> {
        self.lock()?.completion_failure = message.map(str::to_string);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn fetch_calls(&self) -> Result<u32, GatewayError> {
        Ok(self.lock()?.fetch_calls)
    }

    /// Every submission received so far, including failed ones.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn submissions(&self) -> Result<Vec<(QuestionId, String)>, GatewayError> {
        Ok(self.lock()?.submissions.clone())
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the state lock is poisoned.
    pub fn completions(&self) -> Result<Vec<SessionId>, GatewayError> {
        Ok(self.lock()?.completions.clone())
    }
}

#[async_trait]
impl QuestionSource for InMemoryGateway {
    async fn fetch_questions(&self, session_id: SessionId) -> Result<Vec<Question>, GatewayError> {
        let mut guard = self.lock()?;
        guard.fetch_calls = guard.fetch_calls.saturating_add(1);
        if let Some(message) = guard.fetch_failure.clone() {
            return Err(GatewayError::Transport(message));
        }
        guard
            .questions
            .get(&session_id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }
}

#[async_trait]
impl AnswerScorer for InMemoryGateway {
    async fn submit_answer(
        &self,
        question_id: QuestionId,
        answer: &str,
    ) -> Result<Feedback, GatewayError> {
        let result = {
            let mut guard = self.lock()?;
            guard.submissions.push((question_id, answer.to_string()));
            if guard.submit_failures > 0 {
                guard.submit_failures -= 1;
                Err(GatewayError::Rejected {
                    status: 503,
                    message: "scoring unavailable".into(),
                })
            } else {
                guard
                    .feedback
                    .get(&question_id)
                    .or(guard.default_feedback.as_ref())
                    .cloned()
                    .ok_or(GatewayError::NotFound)
            }
        };

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        result
    }
}

#[async_trait]
impl CompletionReporter for InMemoryGateway {
    async fn complete_session(&self, session_id: SessionId) -> Result<(), GatewayError> {
        let mut guard = self.lock()?;
        guard.completions.push(session_id);
        match guard.completion_failure.clone() {
            Some(message) => Err(GatewayError::Transport(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::{Difficulty, Score};

    fn question(id: u64) -> Question {
        Question::new(QuestionId::new(id), format!("Q{id}"), "technical", Difficulty::Easy, 60)
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let gateway = InMemoryGateway::new();
        let err = gateway.fetch_questions(SessionId::new(1)).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound));
        assert_eq!(gateway.fetch_calls().unwrap(), 1);
    }

    #[tokio::test]
    async fn scripted_feedback_wins_over_default() {
        let gateway = InMemoryGateway::new();
        let scripted = Feedback::new(Score::new(90).unwrap(), "great");
        let fallback = Feedback::new(Score::new(10).unwrap(), "meh");
        gateway.set_feedback(QuestionId::new(1), scripted.clone()).unwrap();
        gateway.set_default_feedback(fallback.clone()).unwrap();

        let first = gateway.submit_answer(QuestionId::new(1), "a").await.unwrap();
        let second = gateway.submit_answer(QuestionId::new(2), "b").await.unwrap();

        assert_eq!(first, scripted);
        assert_eq!(second, fallback);
    }

    #[tokio::test]
    async fn injected_submission_failures_are_consumed() {
        let gateway = InMemoryGateway::new();
        gateway
            .set_default_feedback(Feedback::new(Score::new(50).unwrap(), "ok"))
            .unwrap();
        gateway.fail_next_submissions(1).unwrap();

        assert!(gateway.submit_answer(QuestionId::new(1), "x").await.is_err());
        assert!(gateway.submit_answer(QuestionId::new(1), "x").await.is_ok());
        assert_eq!(gateway.submissions().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn gateway_bundle_shares_state() {
        let memory = InMemoryGateway::new();
        memory
            .insert_questions(SessionId::new(3), vec![question(1), question(2)])
            .unwrap();
        let gateway = Gateway::in_memory(memory.clone());

        let questions = gateway.questions.fetch_questions(SessionId::new(3)).await.unwrap();
        gateway.reporter.complete_session(SessionId::new(3)).await.unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(memory.completions().unwrap(), vec![SessionId::new(3)]);
    }
}
