use std::time::Duration;

use gateway::{GatewayError, InMemoryGateway};
use interview_core::model::{Difficulty, Feedback, Question, QuestionId, Score, SessionId};

pub const DEMO_SESSION_ID: SessionId = SessionId::new(1);

const DEMO_QUESTIONS: [(&str, &str, Difficulty, u32); 3] = [
    (
        "Walk me through how you would debug a memory leak in a long-running service.",
        "technical",
        Difficulty::Medium,
        120,
    ),
    (
        "Tell me about a time you disagreed with a teammate. How was it resolved?",
        "behavioral",
        Difficulty::Easy,
        90,
    ),
    (
        "Design a rate limiter shared by several API servers.",
        "system design",
        Difficulty::Hard,
        180,
    ),
];

/// In-memory collaborators preloaded with a short sample interview.
///
/// # Errors
///
/// Returns `GatewayError` if a sample question or feedback fails validation.
pub fn demo_gateway(time_limit_override: Option<u32>) -> Result<InMemoryGateway, GatewayError> {
    let memory = InMemoryGateway::new().with_latency(Duration::from_millis(800));

    let mut questions = Vec::with_capacity(DEMO_QUESTIONS.len());
    for (id, (prompt, category, difficulty, limit)) in (1_u64..).zip(DEMO_QUESTIONS) {
        let question = Question::new(
            QuestionId::new(id),
            prompt,
            category,
            difficulty,
            time_limit_override.unwrap_or(limit),
        )
        .map_err(interview_core::Error::from)?;
        questions.push(question);
    }
    memory.insert_questions(DEMO_SESSION_ID, questions)?;

    let score = Score::new(74).map_err(interview_core::Error::from)?;
    memory.set_default_feedback(
        Feedback::new(score, "A reasonable answer with room for more concrete detail.")
            .with_strengths(vec!["Clear structure".into()])
            .with_improvement_areas(vec!["Quantify the impact".into()]),
    )?;
    Ok(memory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::QuestionSource;

    #[tokio::test]
    async fn demo_gateway_serves_sample_questions() {
        let memory = demo_gateway(Some(15)).unwrap();
        let questions = memory.fetch_questions(DEMO_SESSION_ID).await.unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.time_limit_secs() == 15));
    }
}
