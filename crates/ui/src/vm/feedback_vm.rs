use interview_core::model::Feedback;

/// Feedback panel contents. Lists are only present when the scorer reported items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub score: u8,
    pub score_label: String,
    pub evaluation: String,
    pub strengths: Option<Vec<String>>,
    pub improvement_areas: Option<Vec<String>>,
}

impl From<&Feedback> for FeedbackVm {
    fn from(feedback: &Feedback) -> Self {
        Self {
            score: feedback.score().value(),
            score_label: feedback.score().to_string(),
            evaluation: feedback.evaluation().to_string(),
            strengths: feedback
                .has_strengths()
                .then(|| feedback.strengths().unwrap_or_default().to_vec()),
            improvement_areas: feedback
                .has_improvement_areas()
                .then(|| feedback.improvement_areas().unwrap_or_default().to_vec()),
        }
    }
}
