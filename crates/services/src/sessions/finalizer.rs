use std::sync::Arc;

use gateway::CompletionReporter;
use log::{info, warn};

use crate::error::SessionError;
use super::service::InterviewSession;

/// Reports a finished session upstream, at most once per session.
#[derive(Clone)]
pub struct CompletionFinalizer {
    reporter: Arc<dyn CompletionReporter>,
}

impl CompletionFinalizer {
    #[must_use]
    pub fn new(reporter: Arc<dyn CompletionReporter>) -> Self {
        Self { reporter }
    }

    /// Notify the reporter that `session` is complete.
    ///
    /// Returns `Ok(false)` without calling out if the report was already made.
    /// A failed report is not retried; the session stays `Completed` either way.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before completion and
    /// `SessionError::CompletionReport` if the reporter fails.
    pub async fn finalize(&self, session: &mut InterviewSession) -> Result<bool, SessionError> {
        if !session.claim_completion_report()? {
            return Ok(false);
        }

        let id = session.id();
        match self.reporter.complete_session(id).await {
            Ok(()) => {
                info!("session {id} completed");
                Ok(true)
            }
            Err(err) => {
                let err = SessionError::CompletionReport(err);
                warn!("session {id}: {err}");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::BootstrapOutcome;
    use gateway::InMemoryGateway;
    use interview_core::model::{
        Difficulty, Feedback, Question, QuestionId, Score, SessionId, SessionState,
    };
    use interview_core::time::fixed_now;

    fn completed_session() -> InterviewSession {
        let mut session = InterviewSession::new(SessionId::new(9));
        let question =
            Question::new(QuestionId::new(1), "Q1", "technical", Difficulty::Easy, 30).unwrap();
        session
            .apply_bootstrap(BootstrapOutcome::Ready(vec![question]), fixed_now())
            .unwrap();
        let ticket = session.submit_manually("answer").unwrap();
        session
            .resolve_submission(ticket, Ok(Feedback::new(Score::new(80).unwrap(), "ok")))
            .unwrap();
        session.advance(fixed_now()).unwrap();
        session
    }

    #[tokio::test]
    async fn failed_report_leaves_completed_session_untouched() {
        let memory = InMemoryGateway::new();
        memory.set_completion_failure(Some("backend down")).unwrap();
        let finalizer = CompletionFinalizer::new(Arc::new(memory.clone()));
        let mut session = completed_session();
        let before = session.snapshot();

        let err = finalizer.finalize(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::CompletionReport(_)));
        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.last_error().is_none());
        assert_eq!(session.snapshot(), before);

        assert!(!finalizer.finalize(&mut session).await.unwrap());
        assert_eq!(memory.completions().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn report_is_sent_once() {
        let memory = InMemoryGateway::new();
        let finalizer = CompletionFinalizer::new(Arc::new(memory.clone()));
        let mut session = completed_session();

        assert!(finalizer.finalize(&mut session).await.unwrap());
        assert!(!finalizer.finalize(&mut session).await.unwrap());
        assert_eq!(memory.completions().unwrap(), vec![SessionId::new(9)]);
    }
}
