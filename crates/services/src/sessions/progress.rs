/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// 1-based position of the current question, 0 before questions are loaded.
    pub position: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of the interview reached so far, counting the current question.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.position.min(self.total) * 100) / self.total;
        u8::try_from(pct).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_counts_the_current_question() {
        let progress = SessionProgress {
            total: 4,
            position: 1,
            answered: 0,
            remaining: 4,
            is_complete: false,
        };
        assert_eq!(progress.percent(), 25);
    }

    #[test]
    fn percent_of_empty_session_is_zero() {
        let progress = SessionProgress {
            total: 0,
            position: 0,
            answered: 0,
            remaining: 0,
            is_complete: false,
        };
        assert_eq!(progress.percent(), 0);
    }
}
