use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::feedback::Feedback;
use crate::model::ids::{QuestionId, SessionId};

//
// ─── LIFECYCLE ─────────────────────────────────────────────────────────────────
//

/// Lifecycle state of an interview session.
///
/// `Completed` and `Empty` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Loading,
    AwaitingAnswer,
    Evaluating,
    ReviewingFeedback,
    Completed,
    Empty,
    Error,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Empty)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::AwaitingAnswer => "awaiting_answer",
            SessionState::Evaluating => "evaluating",
            SessionState::ReviewingFeedback => "reviewing_feedback",
            SessionState::Completed => "completed",
            SessionState::Empty => "empty",
            SessionState::Error => "error",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What started a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionTrigger {
    /// The candidate pressed submit.
    Manual,
    /// The question's countdown reached zero.
    Expired,
}

impl SubmissionTrigger {
    /// Expiry submissions may carry an empty answer; manual ones may not.
    #[must_use]
    pub fn allows_empty_answer(self) -> bool {
        matches!(self, SubmissionTrigger::Expired)
    }
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// A question that was answered and scored during the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question_id: QuestionId,
    pub answer: String,
    pub trigger: SubmissionTrigger,
    pub feedback: Feedback,
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many answers for a single session: {len}")]
    TooManyAnswers { len: usize },
}

/// Aggregate view of a finished interview session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    session_id: SessionId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    answered: u32,
    auto_submitted: u32,
    average_score: Option<f64>,
}

impl SessionSummary {
    /// Build a summary from the answered-question history.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::TooManyAnswers` if the history cannot fit in `u32`.
    pub fn from_history(
        session_id: SessionId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        history: &[AnsweredQuestion],
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        let answered = u32::try_from(history.len())
            .map_err(|_| SessionSummaryError::TooManyAnswers { len: history.len() })?;

        let mut auto_submitted = 0_u32;
        let mut total = 0_u32;
        for entry in history {
            if entry.trigger == SubmissionTrigger::Expired {
                auto_submitted = auto_submitted.saturating_add(1);
            }
            total = total.saturating_add(u32::from(entry.feedback.score().value()));
        }

        let average_score = (answered > 0).then(|| f64::from(total) / f64::from(answered));

        Ok(Self {
            session_id,
            started_at,
            completed_at,
            answered,
            auto_submitted,
            average_score,
        })
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn auto_submitted(&self) -> u32 {
        self.auto_submitted
    }

    #[must_use]
    pub fn average_score(&self) -> Option<f64> {
        self.average_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Score;
    use crate::time::fixed_now;

    fn answered(id: u64, score: u8, trigger: SubmissionTrigger) -> AnsweredQuestion {
        AnsweredQuestion {
            question_id: QuestionId::new(id),
            answer: String::new(),
            trigger,
            feedback: Feedback::new(Score::new(score).unwrap(), "noted"),
        }
    }

    #[test]
    fn summary_averages_scores_and_counts_expiries() {
        let now = fixed_now();
        let history = vec![
            answered(1, 80, SubmissionTrigger::Manual),
            answered(2, 40, SubmissionTrigger::Expired),
            answered(3, 90, SubmissionTrigger::Manual),
        ];

        let summary = SessionSummary::from_history(SessionId::new(5), now, now, &history).unwrap();

        assert_eq!(summary.answered(), 3);
        assert_eq!(summary.auto_submitted(), 1);
        assert_eq!(summary.average_score(), Some(70.0));
    }

    #[test]
    fn summary_rejects_inverted_time_range() {
        let now = fixed_now();
        let err = SessionSummary::from_history(
            SessionId::new(5),
            now,
            now - chrono::Duration::seconds(1),
            &[],
        )
        .unwrap_err();
        assert_eq!(err, SessionSummaryError::InvalidTimeRange);
    }

    #[test]
    fn only_expiry_allows_empty_answers() {
        assert!(SubmissionTrigger::Expired.allows_empty_answer());
        assert!(!SubmissionTrigger::Manual.allows_empty_answer());
        assert!(SessionState::Empty.is_terminal());
        assert!(!SessionState::Error.is_terminal());
    }
}
