use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("score must be within 0..=100, got {0}")]
    ScoreOutOfRange(f64),
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Integer score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    /// # Errors
    ///
    /// Returns `FeedbackError::ScoreOutOfRange` when `value > 100`.
    pub fn new(value: u8) -> Result<Self, FeedbackError> {
        if value > Self::MAX {
            return Err(FeedbackError::ScoreOutOfRange(f64::from(value)));
        }
        Ok(Self(value))
    }

    /// Convert a fractional score reported by a scorer, rounding to the nearest integer.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::ScoreOutOfRange` for non-finite values or values outside `0..=100`.
    pub fn from_f64(raw: f64) -> Result<Self, FeedbackError> {
        if !raw.is_finite() || !(0.0..=100.0).contains(&raw) {
            return Err(FeedbackError::ScoreOutOfRange(raw));
        }
        // Range was checked above, so the rounded value fits in u8.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = raw.round() as u8;
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = FeedbackError;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        Self::from_f64(raw)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100", self.0)
    }
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Scoring result attached to the current question after a submission.
///
/// `strengths` and `improvement_areas` are `None` when the scorer did not report
/// them at all, and `Some(vec![])` when it reported an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    score: Score,
    evaluation: String,
    strengths: Option<Vec<String>>,
    improvement_areas: Option<Vec<String>>,
}

impl Feedback {
    #[must_use]
    pub fn new(score: Score, evaluation: impl Into<String>) -> Self {
        Self {
            score,
            evaluation: evaluation.into(),
            strengths: None,
            improvement_areas: None,
        }
    }

    #[must_use]
    pub fn with_strengths(mut self, strengths: Vec<String>) -> Self {
        self.strengths = Some(clean_items(strengths));
        self
    }

    #[must_use]
    pub fn with_improvement_areas(mut self, areas: Vec<String>) -> Self {
        self.improvement_areas = Some(clean_items(areas));
        self
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn evaluation(&self) -> &str {
        &self.evaluation
    }

    #[must_use]
    pub fn strengths(&self) -> Option<&[String]> {
        self.strengths.as_deref()
    }

    #[must_use]
    pub fn improvement_areas(&self) -> Option<&[String]> {
        self.improvement_areas.as_deref()
    }

    /// True only when at least one strength was reported.
    #[must_use]
    pub fn has_strengths(&self) -> bool {
        self.strengths.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// True only when at least one improvement area was reported.
    #[must_use]
    pub fn has_improvement_areas(&self) -> bool {
        self.improvement_areas.as_ref().is_some_and(|a| !a.is_empty())
    }
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_scores_round_to_nearest() {
        assert_eq!(Score::from_f64(84.5).unwrap().value(), 85);
        assert_eq!(Score::from_f64(84.49).unwrap().value(), 84);
        assert_eq!(Score::from_f64(0.0).unwrap().value(), 0);
        assert_eq!(Score::from_f64(100.0).unwrap().value(), 100);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        assert!(Score::from_f64(-1.0).is_err());
        assert!(Score::from_f64(100.01).is_err());
        assert!(Score::from_f64(f64::NAN).is_err());
        assert!(Score::new(101).is_err());
    }

    #[test]
    fn absent_and_empty_lists_are_distinguished() {
        let score = Score::new(70).unwrap();
        let bare = Feedback::new(score, "ok");
        assert_eq!(bare.strengths(), None);
        assert!(!bare.has_strengths());

        let empty = Feedback::new(score, "ok").with_strengths(vec!["  ".into()]);
        assert_eq!(empty.strengths(), Some(&[][..]));
        assert!(!empty.has_strengths());

        let listed = Feedback::new(score, "ok")
            .with_strengths(vec!["clear structure".into()])
            .with_improvement_areas(vec!["more metrics".into()]);
        assert!(listed.has_strengths());
        assert!(listed.has_improvement_areas());
    }

    #[test]
    fn score_deserializes_from_float() {
        let score: Score = serde_json::from_str("72.6").unwrap();
        assert_eq!(score.value(), 73);
        assert!(serde_json::from_str::<Score>("140").is_err());
    }
}
