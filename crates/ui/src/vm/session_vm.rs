use interview_core::model::SessionState;
use services::SessionSnapshot;

use crate::vm::feedback_vm::FeedbackVm;
use crate::vm::time_fmt::{format_timer, is_low_time};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Answering,
    Evaluating,
    Reviewing,
    Completed,
    Empty,
    Failed,
}

impl From<SessionState> for SessionPhase {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Loading => Self::Loading,
            SessionState::AwaitingAnswer => Self::Answering,
            SessionState::Evaluating => Self::Evaluating,
            SessionState::ReviewingFeedback => Self::Reviewing,
            SessionState::Completed => Self::Completed,
            SessionState::Empty => Self::Empty,
            SessionState::Error => Self::Failed,
        }
    }
}

/// Everything an interview screen shows, derived from one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionVm {
    pub phase: SessionPhase,
    pub title: String,
    pub prompt: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub timer: Option<String>,
    pub timer_urgent: bool,
    pub progress_percent: u8,
    pub answer: String,
    pub feedback: Option<FeedbackVm>,
    pub error: Option<String>,
    pub can_submit: bool,
    pub can_advance: bool,
    pub advance_label: &'static str,
}

impl SessionVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let phase = SessionPhase::from(snapshot.state);
        let question = snapshot.question();
        let progress = snapshot.progress;

        let title = match phase {
            SessionPhase::Loading => "Loading questions...".to_string(),
            SessionPhase::Empty => "No questions available for this interview.".to_string(),
            SessionPhase::Failed => "Could not load the interview.".to_string(),
            SessionPhase::Completed => "Interview complete".to_string(),
            _ => format!("Question {} of {}", progress.position, progress.total),
        };

        // Timer is shown while answering, including after a failed submission left it stopped.
        let timer = (phase == SessionPhase::Answering).then(|| format_timer(snapshot.remaining_secs));

        Self {
            phase,
            title,
            prompt: question.map(|q| q.prompt().to_string()),
            category: question
                .map(|q| q.category().to_string())
                .filter(|category| !category.is_empty()),
            difficulty: question.map(|q| q.difficulty().to_string()),
            timer,
            timer_urgent: snapshot.countdown_running && is_low_time(snapshot.remaining_secs),
            progress_percent: progress.percent(),
            answer: snapshot.answer.clone(),
            feedback: snapshot.feedback.as_ref().map(FeedbackVm::from),
            error: snapshot.error.clone(),
            can_submit: phase == SessionPhase::Answering && !snapshot.submission_pending,
            can_advance: phase == SessionPhase::Reviewing,
            advance_label: if snapshot.is_last_question() {
                "Finish interview"
            } else {
                "Next question"
            },
        }
    }
}
