use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use gateway::GatewayError;
use interview_core::model::{
    AnsweredQuestion, Feedback, Question, SessionId, SessionState, SessionSummary,
    SubmissionTrigger,
};
use interview_core::{Countdown, Tick};
use log::{debug, warn};

use crate::error::SessionError;
use super::bootstrap::BootstrapOutcome;
use super::progress::SessionProgress;
use super::submission::{RearmPolicy, SubmissionSlot, SubmissionTicket};
use super::view::SessionSnapshot;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What a one-second tick did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is running.
    Idle,
    /// Time remains on the current question.
    Counting { remaining_secs: u32 },
    /// Time ran out; the buffered answer must now be scored.
    AutoSubmit(SubmissionTicket),
}

/// Result of advancing past a reviewed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One candidate's attempt at an ordered list of interview questions.
///
/// This is the only writer of session state. Collaborator calls happen outside;
/// their results are handed back through [`apply_bootstrap`](Self::apply_bootstrap),
/// [`resolve_submission`](Self::resolve_submission) and friends.
pub struct InterviewSession {
    id: SessionId,
    state: SessionState,
    questions: Arc<[Question]>,
    current: usize,
    feedback: Option<Feedback>,
    answer: String,
    countdown: Countdown,
    slot: SubmissionSlot,
    rearm: RearmPolicy,
    history: Vec<AnsweredQuestion>,
    last_error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    completion_claimed: bool,
}

impl InterviewSession {
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: SessionState::Loading,
            questions: Arc::from(Vec::new()),
            current: 0,
            feedback: None,
            answer: String::new(),
            countdown: Countdown::new(),
            slot: SubmissionSlot::default(),
            rearm: RearmPolicy::default(),
            history: Vec::new(),
            last_error: None,
            started_at: None,
            completed_at: None,
            completion_claimed: false,
        }
    }

    #[must_use]
    pub fn with_rearm_policy(mut self, rearm: RearmPolicy) -> Self {
        self.rearm = rearm;
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question being answered or reviewed, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::AwaitingAnswer
            | SessionState::Evaluating
            | SessionState::ReviewingFeedback => self.questions.get(self.current),
            _ => None,
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Answer text currently buffered for the current question.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    #[must_use]
    pub fn is_countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Increments every time a deadline is (re)started.
    #[must_use]
    pub fn countdown_cycle(&self) -> u64 {
        self.countdown.cycle()
    }

    #[must_use]
    pub fn is_submission_pending(&self) -> bool {
        self.slot.is_pending()
    }

    #[must_use]
    pub fn history(&self) -> &[AnsweredQuestion] {
        &self.history
    }

    /// Displayable message of the last collaborator failure, cleared on progress.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn rearm_policy(&self) -> RearmPolicy {
        self.rearm
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let position = if total == 0 { 0 } else { self.current + 1 };
        SessionProgress {
            total,
            position,
            answered: self.history.len(),
            remaining: total.saturating_sub(self.history.len()),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            state: self.state,
            index: self.current,
            questions: Arc::clone(&self.questions),
            feedback: self.feedback.clone(),
            remaining_secs: self.countdown.remaining_secs(),
            countdown_running: self.countdown.is_running(),
            submission_pending: self.slot.is_pending(),
            answer: self.answer.clone(),
            error: self.last_error.clone(),
            progress: self.progress(),
        }
    }

    /// Summary of a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before completion, or a summary
    /// validation error.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let (Some(started_at), Some(completed_at)) = (self.started_at, self.completed_at) else {
            return Err(self.invalid("summarize"));
        };
        Ok(SessionSummary::from_history(
            self.id,
            started_at,
            completed_at,
            &self.history,
        )?)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        if self.state == SessionState::Completed {
            SessionError::Completed
        } else {
            SessionError::InvalidTransition {
                action,
                state: self.state,
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        if next != SessionState::AwaitingAnswer && self.countdown.disarm() {
            warn!("session {}: deadline still armed leaving {}", self.id, self.state);
        }
        debug!("session {}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }

    //
    // ─── BOOTSTRAP ─────────────────────────────────────────────────────────────
    //

    /// Enter `Loading`, either initially or as a retry after a failed load.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `Loading` or `Error`.
    pub fn begin_loading(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Loading => Ok(()),
            SessionState::Error => {
                self.last_error = None;
                self.transition(SessionState::Loading);
                Ok(())
            }
            _ => Err(self.invalid("load questions")),
        }
    }

    /// Install the fetched question list and start the first deadline.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `Loading`.
    pub fn apply_bootstrap(
        &mut self,
        outcome: BootstrapOutcome,
        now: DateTime<Utc>,
    ) -> Result<SessionState, SessionError> {
        if self.state != SessionState::Loading {
            return Err(self.invalid("load questions"));
        }

        let questions = match outcome {
            BootstrapOutcome::Ready(questions) => questions,
            BootstrapOutcome::Empty => Vec::new(),
        };
        match questions.first().map(Question::time_limit_secs) {
            None => {
                self.transition(SessionState::Empty);
            }
            Some(first_limit) => {
                self.questions = Arc::from(questions);
                self.current = 0;
                self.started_at = Some(now);
                self.transition(SessionState::AwaitingAnswer);
                self.countdown.arm(first_limit);
            }
        }
        Ok(self.state)
    }

    /// Record a failed load. The session keeps no questions.
    pub fn fail_bootstrap(&mut self, err: &SessionError) {
        if self.state != SessionState::Loading {
            return;
        }
        self.last_error = Some(err.to_string());
        self.transition(SessionState::Error);
    }

    //
    // ─── ANSWERING ─────────────────────────────────────────────────────────────
    //

    /// Replace the buffered answer text.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `AwaitingAnswer`.
    pub fn update_answer(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.state != SessionState::AwaitingAnswer {
            return Err(self.invalid("edit the answer"));
        }
        self.answer = text.into();
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// On expiry the submission slot is taken with whatever answer is buffered,
    /// and the returned ticket must be scored and handed back.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::AwaitingAnswer {
            return TickOutcome::Idle;
        }

        match self.countdown.tick() {
            Tick::Idle => TickOutcome::Idle,
            Tick::Running { remaining_secs } => TickOutcome::Counting { remaining_secs },
            Tick::Expired => match self.begin_submission(SubmissionTrigger::Expired) {
                Ok(ticket) => TickOutcome::AutoSubmit(ticket),
                Err(err) => {
                    debug!("session {}: expiry ignored: {err}", self.id);
                    TickOutcome::Idle
                }
            },
        }
    }

    /// Submit `text` as the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SubmissionPending` while another answer is being scored,
    /// `SessionError::EmptyAnswer` for blank text, and `InvalidTransition`/`Completed`
    /// outside `AwaitingAnswer`. Rejections leave the session unchanged.
    pub fn submit_manually(
        &mut self,
        text: impl Into<String>,
    ) -> Result<SubmissionTicket, SessionError> {
        if self.slot.is_pending() {
            return Err(SessionError::SubmissionPending);
        }
        if self.state != SessionState::AwaitingAnswer {
            return Err(self.invalid("submit an answer"));
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        self.answer = text;
        self.begin_submission(SubmissionTrigger::Manual)
    }

    fn begin_submission(
        &mut self,
        trigger: SubmissionTrigger,
    ) -> Result<SubmissionTicket, SessionError> {
        let Some(question_id) = self.current_question().map(Question::id) else {
            return Err(self.invalid("submit an answer"));
        };
        let ticket = self.slot.acquire(question_id, &self.answer, trigger)?;
        self.countdown.disarm();
        self.last_error = None;
        self.transition(SessionState::Evaluating);
        Ok(ticket)
    }

    /// Hand back the scoring result for the pending submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StaleSubmission` if `ticket` does not hold the slot, and
    /// `SessionError::Submission` when scoring failed; in that case the session is back
    /// in `AwaitingAnswer` with the answer text preserved.
    pub fn resolve_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<Feedback, GatewayError>,
    ) -> Result<&Feedback, SessionError> {
        self.slot.release(&ticket)?;

        match result {
            Ok(feedback) => {
                self.history.push(AnsweredQuestion {
                    question_id: ticket.question_id(),
                    answer: ticket.answer().to_string(),
                    trigger: ticket.trigger(),
                    feedback: feedback.clone(),
                });
                self.answer.clear();
                self.transition(SessionState::ReviewingFeedback);
                let feedback: &Feedback = self.feedback.insert(feedback);
                Ok(feedback)
            }
            Err(err) => {
                let err = SessionError::Submission(err);
                warn!("session {}: {err}", self.id);
                self.last_error = Some(err.to_string());
                self.transition(SessionState::AwaitingAnswer);
                self.rearm_after_failure();
                Err(err)
            }
        }
    }

    fn rearm_after_failure(&mut self) {
        match self.rearm {
            RearmPolicy::StayDisarmed => {}
            RearmPolicy::ResumeRemaining => {
                self.countdown.resume();
            }
            RearmPolicy::FreshLimit => {
                if let Some(limit) = self.current_question().map(Question::time_limit_secs) {
                    self.countdown.arm(limit);
                }
            }
        }
    }

    //
    // ─── PROGRESSION ───────────────────────────────────────────────────────────
    //

    /// Leave the reviewed question for the next one, or complete the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once completed and `InvalidTransition`
    /// outside `ReviewingFeedback`.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        if self.state != SessionState::ReviewingFeedback {
            return Err(self.invalid("advance"));
        }

        self.feedback = None;
        self.last_error = None;

        let next = self.current + 1;
        if let Some(limit) = self.questions.get(next).map(Question::time_limit_secs) {
            self.current = next;
            self.transition(SessionState::AwaitingAnswer);
            self.countdown.arm(limit);
            Ok(Advance::Next { index: next })
        } else {
            self.completed_at = Some(now);
            self.transition(SessionState::Completed);
            Ok(Advance::Completed)
        }
    }

    /// Claim the one-time right to report completion upstream.
    ///
    /// Returns `Ok(false)` if it was already claimed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before the session is completed.
    pub fn claim_completion_report(&mut self) -> Result<bool, SessionError> {
        if self.state != SessionState::Completed {
            return Err(self.invalid("report completion"));
        }
        Ok(!std::mem::replace(&mut self.completion_claimed, true))
    }
}

impl fmt::Debug for InterviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterviewSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("countdown", &self.countdown)
            .field("pending", &self.slot.is_pending())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
