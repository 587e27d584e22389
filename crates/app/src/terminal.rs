use interview_core::model::SessionState;
use services::{RunnerHandle, SessionError, SessionSnapshot};
use tokio::io::{AsyncBufReadExt, BufReader};
use ui::{SessionVm, render_session};

/// One line typed by the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInput {
    Text(String),
    Submit,
    Clear,
    Next,
    Retry,
    Quit,
}

impl HostInput {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":submit" | ":s" => Self::Submit,
            ":clear" => Self::Clear,
            ":next" | ":n" => Self::Next,
            ":retry" => Self::Retry,
            ":quit" | ":q" => Self::Quit,
            _ => Self::Text(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

pub fn print_controls() {
    println!("Type your answer; each line is appended to the draft.");
    println!("  :submit  send the draft    :clear  discard the draft");
    println!("  :next    next question     :retry  reload after an error");
    println!("  :quit    leave");
}

/// What changed between two snapshots that is worth printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Redraw {
    Screen,
    Timer,
    Nothing,
}

fn redraw(previous: Option<&SessionSnapshot>, next: &SessionSnapshot) -> Redraw {
    let Some(previous) = previous else {
        return Redraw::Screen;
    };
    if previous.state != next.state
        || previous.index != next.index
        || previous.error != next.error
        || previous.feedback != next.feedback
    {
        return Redraw::Screen;
    }
    let ticked = previous.remaining_secs != next.remaining_secs && next.countdown_running;
    if ticked && (next.remaining_secs % 30 == 0 || next.remaining_secs <= 10) {
        Redraw::Timer
    } else {
        Redraw::Nothing
    }
}

/// Append a typed line to the local draft. Lines typed while no answer is
/// being taken are dropped.
fn append_line(draft: &mut String, state: SessionState, text: &str) -> bool {
    if state != SessionState::AwaitingAnswer {
        return false;
    }
    if !draft.is_empty() {
        draft.push('\n');
    }
    draft.push_str(text);
    true
}

/// Drive a spawned runner from stdin until the session ends or the candidate quits.
///
/// # Errors
///
/// Returns `SessionError::RunnerStopped` if the runner goes away, or an I/O error from stdin.
pub async fn drive(handle: &RunnerHandle) -> Result<SessionState, Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut snapshots = handle.snapshots();
    let mut shown: Option<SessionSnapshot> = None;
    let mut draft = String::new();

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        match redraw(shown.as_ref(), &snapshot) {
            Redraw::Screen => print!("{}", render_session(&SessionVm::from_snapshot(&snapshot))),
            Redraw::Timer => println!("  {}s left", snapshot.remaining_secs),
            Redraw::Nothing => {}
        }
        if snapshot.state == SessionState::ReviewingFeedback
            && shown.as_ref().is_some_and(|s| s.state != SessionState::ReviewingFeedback)
        {
            draft.clear();
        }
        if snapshot.state.is_terminal() {
            return Ok(snapshot.state);
        }
        let state = snapshot.state;
        shown = Some(snapshot);

        tokio::select! {
            changed = snapshots.changed() => {
                changed.map_err(|_| SessionError::RunnerStopped)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(handle.snapshot().state);
                };
                match HostInput::parse(&line) {
                    HostInput::Text(text) => {
                        if append_line(&mut draft, state, &text) {
                            handle.update_answer(draft.clone()).await?;
                        }
                    }
                    HostInput::Clear => {
                        draft.clear();
                        if state == SessionState::AwaitingAnswer {
                            handle.update_answer(String::new()).await?;
                        }
                    }
                    HostInput::Submit => {
                        if draft.trim().is_empty() {
                            println!("Answer cannot be empty.");
                        } else {
                            handle.submit(draft.clone()).await?;
                        }
                    }
                    HostInput::Next => handle.advance().await?,
                    HostInput::Retry => handle.retry_bootstrap().await?,
                    HostInput::Quit => return Ok(handle.snapshot().state),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::SessionId;
    use services::InterviewSession;

    #[test]
    fn commands_are_recognised_and_text_passes_through() {
        assert_eq!(HostInput::parse(":submit\n"), HostInput::Submit);
        assert_eq!(HostInput::parse(" :q "), HostInput::Quit);
        assert_eq!(
            HostInput::parse("use a mutex\r\n"),
            HostInput::Text("use a mutex".into())
        );
        assert_eq!(HostInput::parse(":unknown"), HostInput::Text(":unknown".into()));
    }

    #[test]
    fn lines_only_join_the_draft_while_answering() {
        let mut draft = String::new();
        assert!(append_line(&mut draft, SessionState::AwaitingAnswer, "first"));
        assert!(append_line(&mut draft, SessionState::AwaitingAnswer, "second"));
        assert_eq!(draft, "first\nsecond");

        for state in [
            SessionState::Loading,
            SessionState::Evaluating,
            SessionState::ReviewingFeedback,
            SessionState::Error,
        ] {
            assert!(!append_line(&mut draft, state, "typed too early"));
        }
        assert_eq!(draft, "first\nsecond");
    }

    #[test]
    fn first_snapshot_draws_the_screen() {
        let snapshot = InterviewSession::new(SessionId::new(1)).snapshot();
        assert_eq!(redraw(None, &snapshot), Redraw::Screen);
        assert_eq!(redraw(Some(&snapshot), &snapshot), Redraw::Nothing);
    }
}
