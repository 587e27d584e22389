use interview_core::model::{
    DEFAULT_TIME_LIMIT_SECS, Difficulty, Feedback, Question, QuestionId, Score,
};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::collaborators::GatewayError;

/// Question row as served by `GET /api/interviews/{id}/questions`.
#[derive(Debug, Deserialize)]
pub(crate) struct QuestionRecord {
    id: u64,
    question_text: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    time_limit_seconds: Option<u32>,
}

impl QuestionRecord {
    pub(crate) fn into_question(self) -> Result<Question, GatewayError> {
        let difficulty = match self.difficulty.as_deref() {
            None | Some("") => Difficulty::Medium,
            Some(raw) => raw.parse::<Difficulty>().unwrap_or_else(|err| {
                warn!("question {}: {err}, using medium", self.id);
                Difficulty::Medium
            }),
        };
        let question = Question::new(
            QuestionId::new(self.id),
            self.question_text,
            self.category.unwrap_or_default(),
            difficulty,
            self.time_limit_seconds.unwrap_or(DEFAULT_TIME_LIMIT_SECS),
        )
        .map_err(interview_core::Error::from)?;
        Ok(question)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerPayload<'a> {
    pub answer: &'a str,
}

/// Scoring result as returned by `POST /api/interview-questions/{id}/answer`.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackRecord {
    score: f64,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    strengths: Option<Vec<String>>,
    #[serde(default, alias = "improvement_areas")]
    areas_for_improvement: Option<Vec<String>>,
}

impl FeedbackRecord {
    pub(crate) fn into_feedback(self) -> Result<Feedback, GatewayError> {
        let score = Score::from_f64(self.score).map_err(interview_core::Error::from)?;
        let mut feedback = Feedback::new(score, self.feedback.unwrap_or_default().trim());
        if let Some(strengths) = self.strengths {
            feedback = feedback.with_strengths(strengths);
        }
        if let Some(areas) = self.areas_for_improvement {
            feedback = feedback.with_improvement_areas(areas);
        }
        Ok(feedback)
    }
}

pub(crate) fn decode_questions(body: &str) -> Result<Vec<Question>, GatewayError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect()
}

pub(crate) fn decode_feedback(body: &str) -> Result<Feedback, GatewayError> {
    let record: FeedbackRecord =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    record.into_feedback()
}
