//! Plain-text rendering of the view models, for terminal hosts.

use std::fmt::Write;

use crate::vm::{FeedbackVm, SessionPhase, SessionSummaryVm, SessionVm};

/// Render the whole interview screen.
#[must_use]
pub fn render_session(vm: &SessionVm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ({}%) ==", vm.title, vm.progress_percent);

    if let Some(prompt) = &vm.prompt {
        let mut tags: Vec<&str> = Vec::new();
        if let Some(category) = &vm.category {
            tags.push(category);
        }
        if let Some(difficulty) = &vm.difficulty {
            tags.push(difficulty);
        }
        if !tags.is_empty() {
            let _ = writeln!(out, "[{}]", tags.join(" | "));
        }
        let _ = writeln!(out, "{prompt}");
    }

    if let Some(timer) = &vm.timer {
        let marker = if vm.timer_urgent { " !" } else { "" };
        let _ = writeln!(out, "Time left: {timer}{marker}");
    }

    match vm.phase {
        SessionPhase::Answering if !vm.answer.is_empty() => {
            let _ = writeln!(out, "Draft: {}", vm.answer);
        }
        SessionPhase::Evaluating => {
            let _ = writeln!(out, "Evaluating your answer...");
        }
        _ => {}
    }

    if let Some(feedback) = &vm.feedback {
        out.push_str(&render_feedback(feedback));
    }
    if let Some(error) = &vm.error {
        let _ = writeln!(out, "Error: {error}");
    }
    out
}

#[must_use]
pub fn render_feedback(feedback: &FeedbackVm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Score: {}", feedback.score_label);
    if !feedback.evaluation.is_empty() {
        let _ = writeln!(out, "{}", feedback.evaluation);
    }
    push_list(&mut out, "Strengths", feedback.strengths.as_deref());
    push_list(&mut out, "Areas for improvement", feedback.improvement_areas.as_deref());
    out
}

fn push_list(out: &mut String, heading: &str, items: Option<&[String]>) {
    let Some(items) = items else { return };
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

#[must_use]
pub fn render_summary(summary: &SessionSummaryVm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Interview {} finished in {}", summary.session_id, summary.duration_str);
    let _ = writeln!(
        out,
        "Answered: {} ({} on timeout)",
        summary.answered, summary.auto_submitted
    );
    let _ = writeln!(out, "Average score: {}", summary.average_score_str);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answering() -> SessionVm {
        SessionVm {
            phase: SessionPhase::Answering,
            title: "Question 2 of 3".into(),
            prompt: Some("Describe a deadlock.".into()),
            category: None,
            difficulty: Some("medium".into()),
            timer: Some("0:12".into()),
            timer_urgent: true,
            progress_percent: 66,
            answer: "Two threads".into(),
            feedback: None,
            error: None,
            can_submit: true,
            can_advance: false,
            advance_label: "Next question",
        }
    }

    #[test]
    fn answering_screen_lists_timer_and_draft() {
        let text = render_session(&answering());
        assert_eq!(
            text,
            "== Question 2 of 3 (66%) ==\n[medium]\nDescribe a deadlock.\nTime left: 0:12 !\nDraft: Two threads\n"
        );
    }

    #[test]
    fn feedback_sections_only_render_when_present() {
        let feedback = FeedbackVm {
            score: 70,
            score_label: "70/100".into(),
            evaluation: "Good start.".into(),
            strengths: Some(vec!["examples".into()]),
            improvement_areas: None,
        };
        let text = render_feedback(&feedback);
        assert!(text.contains("Strengths:\n  - examples\n"));
        assert!(!text.contains("Areas for improvement"));
    }
}
