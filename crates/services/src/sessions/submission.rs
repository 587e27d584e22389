use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use gateway::{AnswerScorer, GatewayError};
use interview_core::model::{Feedback, QuestionId, SubmissionTrigger};
use log::debug;

use crate::error::SessionError;

/// What happens to the countdown after a submission fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RearmPolicy {
    /// Leave the countdown stopped; the candidate may retry without a deadline.
    #[default]
    StayDisarmed,
    /// Continue from the seconds that were left when the submission started.
    ResumeRemaining,
    /// Start the question's full time limit again.
    FreshLimit,
}

impl RearmPolicy {
    #[must_use]
    pub fn from_arg(raw: &str) -> Option<Self> {
        match raw.trim() {
            "stay" | "stay-disarmed" => Some(Self::StayDisarmed),
            "resume" | "resume-remaining" => Some(Self::ResumeRemaining),
            "fresh" | "fresh-limit" => Some(Self::FreshLimit),
            _ => None,
        }
    }
}

/// Proof that the single submission slot was acquired.
///
/// The session only accepts a scoring result together with the ticket that
/// currently holds the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    seq: u64,
    question_id: QuestionId,
    answer: String,
    trigger: SubmissionTrigger,
}

impl SubmissionTicket {
    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn trigger(&self) -> SubmissionTrigger {
        self.trigger
    }
}

/// The at-most-one pending submission of a session.
#[derive(Debug, Default)]
pub(crate) struct SubmissionSlot {
    pending: Option<u64>,
    next_seq: u64,
}

impl SubmissionSlot {
    pub(crate) fn acquire(
        &mut self,
        question_id: QuestionId,
        answer: &str,
        trigger: SubmissionTrigger,
    ) -> Result<SubmissionTicket, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::SubmissionPending);
        }
        if !trigger.allows_empty_answer() && answer.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending = Some(seq);

        Ok(SubmissionTicket {
            seq,
            question_id,
            answer: answer.to_string(),
            trigger,
        })
    }

    pub(crate) fn release(&mut self, ticket: &SubmissionTicket) -> Result<(), SessionError> {
        if self.pending != Some(ticket.seq) {
            return Err(SessionError::StaleSubmission);
        }
        self.pending = None;
        Ok(())
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Scoring future that owns everything it needs, so it can be polled next to the session.
pub type ScoringFuture =
    Pin<Box<dyn Future<Output = (SubmissionTicket, Result<Feedback, GatewayError>)> + Send>>;

/// Issues scoring requests for accepted submissions.
#[derive(Clone)]
pub struct SubmissionCoordinator {
    scorer: Arc<dyn AnswerScorer>,
}

impl SubmissionCoordinator {
    #[must_use]
    pub fn new(scorer: Arc<dyn AnswerScorer>) -> Self {
        Self { scorer }
    }

    /// Score the ticket's answer.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's `GatewayError` unchanged.
    pub async fn score(&self, ticket: &SubmissionTicket) -> Result<Feedback, GatewayError> {
        debug!(
            "scoring question {} ({:?}, {} chars)",
            ticket.question_id,
            ticket.trigger,
            ticket.answer.chars().count()
        );
        self.scorer
            .submit_answer(ticket.question_id, &ticket.answer)
            .await
    }

    /// Like [`score`](Self::score) but detached from `self`, handing the ticket back with the result.
    #[must_use]
    pub fn scoring(&self, ticket: SubmissionTicket) -> ScoringFuture {
        let coordinator = self.clone();
        Box::pin(async move {
            let result = coordinator.score(&ticket).await;
            (ticket, result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_while_pending() {
        let mut slot = SubmissionSlot::default();
        let ticket = slot
            .acquire(QuestionId::new(1), "answer", SubmissionTrigger::Manual)
            .unwrap();

        let err = slot
            .acquire(QuestionId::new(1), "", SubmissionTrigger::Expired)
            .unwrap_err();
        assert!(matches!(err, SessionError::SubmissionPending));

        slot.release(&ticket).unwrap();
        assert!(!slot.is_pending());
    }

    #[test]
    fn manual_blank_answer_is_rejected_but_expiry_is_not() {
        let mut slot = SubmissionSlot::default();
        let err = slot
            .acquire(QuestionId::new(1), "  \n", SubmissionTrigger::Manual)
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyAnswer));
        assert!(!slot.is_pending());

        let ticket = slot
            .acquire(QuestionId::new(1), "", SubmissionTrigger::Expired)
            .unwrap();
        assert_eq!(ticket.answer(), "");
        assert_eq!(ticket.trigger(), SubmissionTrigger::Expired);
    }

    #[test]
    fn releasing_an_old_ticket_is_stale() {
        let mut slot = SubmissionSlot::default();
        let first = slot
            .acquire(QuestionId::new(1), "a", SubmissionTrigger::Manual)
            .unwrap();
        slot.release(&first).unwrap();
        let _second = slot
            .acquire(QuestionId::new(2), "b", SubmissionTrigger::Manual)
            .unwrap();

        assert!(matches!(
            slot.release(&first),
            Err(SessionError::StaleSubmission)
        ));
        assert!(slot.is_pending());
    }

    #[test]
    fn rearm_policy_parses_cli_values() {
        assert_eq!(RearmPolicy::from_arg("stay"), Some(RearmPolicy::StayDisarmed));
        assert_eq!(RearmPolicy::from_arg("resume"), Some(RearmPolicy::ResumeRemaining));
        assert_eq!(RearmPolicy::from_arg("fresh-limit"), Some(RearmPolicy::FreshLimit));
        assert_eq!(RearmPolicy::from_arg("later"), None);
    }
}
