use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Time limit applied when the question source omits one.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 120;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question time limit must be > 0")]
    ZeroTimeLimit,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One interview question. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    category: String,
    difficulty: Difficulty,
    time_limit_secs: u32,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt and
    /// `QuestionError::ZeroTimeLimit` when no time would be given to answer.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        time_limit_secs: u32,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if time_limit_secs == 0 {
            return Err(QuestionError::ZeroTimeLimit);
        }

        Ok(Self {
            id,
            prompt: prompt.trim().to_string(),
            category: category.into().trim().to_string(),
            difficulty,
            time_limit_secs,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompt_is_rejected() {
        let err = Question::new(QuestionId::new(1), "   ", "technical", Difficulty::Easy, 60)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn zero_time_limit_is_rejected() {
        let err = Question::new(QuestionId::new(1), "Why Rust?", "technical", Difficulty::Easy, 0)
            .unwrap_err();
        assert_eq!(err, QuestionError::ZeroTimeLimit);
    }

    #[test]
    fn prompt_and_category_are_trimmed() {
        let q = Question::new(
            QuestionId::new(3),
            "  Describe a project.\n",
            " behavioral ",
            Difficulty::Medium,
            180,
        )
        .unwrap();
        assert_eq!(q.prompt(), "Describe a project.");
        assert_eq!(q.category(), "behavioral");
        assert_eq!(q.time_limit_secs(), 180);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!(matches!(
            "expert".parse::<Difficulty>(),
            Err(QuestionError::UnknownDifficulty(_))
        ));
    }
}
