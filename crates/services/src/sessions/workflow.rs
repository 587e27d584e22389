use std::time::Duration;

use gateway::{Gateway, GatewayError};
use interview_core::model::{Feedback, SessionId, SessionState};
use log::{debug, info};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::Clock;
use crate::error::SessionError;
use super::bootstrap::SessionBootstrapper;
use super::finalizer::CompletionFinalizer;
use super::service::{Advance, InterviewSession, TickOutcome};
use super::submission::{RearmPolicy, ScoringFuture, SubmissionCoordinator, SubmissionTicket};
use super::view::SessionSnapshot;

const COMMAND_BUFFER: usize = 16;

/// Input from whoever hosts the session (terminal, UI, test).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    UpdateAnswer(String),
    Submit(String),
    Advance,
    RetryBootstrap,
    Shutdown,
}

/// Drives interview sessions against a set of collaborators.
///
/// Step-wise methods (`bootstrap`, `tick`, `submit_manually`, `advance`) await
/// each collaborator call inline. [`run`](Self::run) instead multiplexes the
/// one-second cadence, host commands and the in-flight scoring call on one task.
#[derive(Clone)]
pub struct InterviewRunner {
    clock: Clock,
    bootstrapper: SessionBootstrapper,
    coordinator: SubmissionCoordinator,
    finalizer: CompletionFinalizer,
    rearm: RearmPolicy,
    tick_period: Duration,
}

impl InterviewRunner {
    #[must_use]
    pub fn new(clock: Clock, gateway: &Gateway) -> Self {
        Self {
            clock,
            bootstrapper: SessionBootstrapper::new(gateway.questions.clone()),
            coordinator: SubmissionCoordinator::new(gateway.scorer.clone()),
            finalizer: CompletionFinalizer::new(gateway.reporter.clone()),
            rearm: RearmPolicy::default(),
            tick_period: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_rearm_policy(mut self, rearm: RearmPolicy) -> Self {
        self.rearm = rearm;
        self
    }

    /// Override the countdown cadence. One second unless a host needs otherwise.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// A fresh `Loading` session using this runner's re-arm policy.
    #[must_use]
    pub fn new_session(&self, id: SessionId) -> InterviewSession {
        InterviewSession::new(id).with_rearm_policy(self.rearm)
    }

    /// Load questions into `session`, from `Loading` or as a retry from `Error`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` after recording the failure in the session,
    /// or `SessionError::InvalidTransition` from any other state.
    pub async fn bootstrap(
        &self,
        session: &mut InterviewSession,
    ) -> Result<SessionState, SessionError> {
        session.begin_loading()?;
        match self.bootstrapper.load(session.id()).await {
            Ok(outcome) => session.apply_bootstrap(outcome, self.clock.now()),
            Err(err) => {
                session.fail_bootstrap(&err);
                Err(err)
            }
        }
    }

    /// One second of countdown; an expiry is scored before returning.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submission` if the automatic submission failed.
    pub async fn tick(&self, session: &mut InterviewSession) -> Result<TickOutcome, SessionError> {
        let outcome = session.tick();
        if let TickOutcome::AutoSubmit(ticket) = &outcome {
            info!(
                "session {}: time expired on question {}",
                session.id(),
                ticket.question_id()
            );
            let result = self.coordinator.score(ticket).await;
            session.resolve_submission(ticket.clone(), result)?;
        }
        Ok(outcome)
    }

    /// Submit the candidate's answer and wait for its feedback.
    ///
    /// # Errors
    ///
    /// Returns the rejection from the session without calling the scorer, or
    /// `SessionError::Submission` if scoring failed.
    pub async fn submit_manually(
        &self,
        session: &mut InterviewSession,
        text: impl Into<String>,
    ) -> Result<Feedback, SessionError> {
        let ticket = session.submit_manually(text)?;
        let result = self.coordinator.score(&ticket).await;
        session.resolve_submission(ticket, result).cloned()
    }

    /// Move past the reviewed question; completing reports upstream once.
    ///
    /// A failed completion report is logged and dropped; it does not fail the
    /// advance and leaves the completed session untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `ReviewingFeedback` and
    /// `SessionError::Completed` after completion.
    pub async fn advance(&self, session: &mut InterviewSession) -> Result<Advance, SessionError> {
        let advance = session.advance(self.clock.now())?;
        if advance == Advance::Completed {
            if let Err(err) = self.finalizer.finalize(session).await {
                debug!("session {}: completion left unreported: {err}", session.id());
            }
        }
        Ok(advance)
    }

    /// Run `session` until a `Shutdown` command arrives or every command sender is dropped.
    ///
    /// A snapshot is published after each change. Rejected commands leave the
    /// session untouched and are only logged.
    pub async fn run(
        &self,
        session: &mut InterviewSession,
        mut commands: mpsc::Receiver<HostCommand>,
        snapshots: &watch::Sender<SessionSnapshot>,
    ) {
        snapshots.send_replace(session.snapshot());
        if session.state() == SessionState::Loading {
            let _ = self.bootstrap(session).await;
            snapshots.send_replace(session.snapshot());
        }

        let mut ticker = time::interval_at(Instant::now() + self.tick_period, self.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle = session.countdown_cycle();
        let mut in_flight: Option<ScoringFuture> = None;

        loop {
            // Each newly armed deadline gets a full period before its first tick.
            if session.countdown_cycle() != cycle {
                cycle = session.countdown_cycle();
                ticker.reset();
            }

            tokio::select! {
                _ = ticker.tick(), if session.is_countdown_running() => {
                    if let TickOutcome::AutoSubmit(ticket) = session.tick() {
                        info!(
                            "session {}: time expired on question {}",
                            session.id(),
                            ticket.question_id()
                        );
                        in_flight = Some(self.coordinator.scoring(ticket));
                    }
                }
                (ticket, result) = settle(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    if let Err(err) = session.resolve_submission(ticket, result) {
                        debug!("session {}: {err}", session.id());
                    }
                }
                command = commands.recv() => match command {
                    None | Some(HostCommand::Shutdown) => break,
                    Some(command) => {
                        if let Err(err) = self.handle(session, command, &mut in_flight).await {
                            info!("session {}: {err}", session.id());
                        }
                    }
                },
            }

            snapshots.send_replace(session.snapshot());
        }

        debug!("session {}: runner stopped in state {}", session.id(), session.state());
    }

    async fn handle(
        &self,
        session: &mut InterviewSession,
        command: HostCommand,
        in_flight: &mut Option<ScoringFuture>,
    ) -> Result<(), SessionError> {
        match command {
            HostCommand::UpdateAnswer(text) => session.update_answer(text),
            HostCommand::Submit(text) => {
                let ticket = session.submit_manually(text)?;
                *in_flight = Some(self.coordinator.scoring(ticket));
                Ok(())
            }
            HostCommand::Advance => self.advance(session).await.map(|_| ()),
            HostCommand::RetryBootstrap => self.bootstrap(session).await.map(|_| ()),
            HostCommand::Shutdown => Ok(()),
        }
    }

    /// Run `session` on its own task and return a handle to drive it.
    #[must_use]
    pub fn spawn(&self, mut session: InterviewSession) -> RunnerHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let runner = self.clone();
        let task = tokio::spawn(async move {
            runner.run(&mut session, command_rx, &snapshot_tx).await;
            session
        });
        RunnerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }
}

async fn settle(
    in_flight: &mut Option<ScoringFuture>,
) -> (SubmissionTicket, Result<Feedback, GatewayError>) {
    match in_flight {
        Some(scoring) => scoring.await,
        None => std::future::pending().await,
    }
}

/// Host side of a spawned runner.
pub struct RunnerHandle {
    commands: mpsc::Sender<HostCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<InterviewSession>,
}

impl RunnerHandle {
    /// # Errors
    ///
    /// Returns `SessionError::RunnerStopped` if the runner is gone.
    pub async fn send(&self, command: HostCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::RunnerStopped)
    }

    /// # Errors
    ///
    /// Returns `SessionError::RunnerStopped` if the runner is gone.
    pub async fn update_answer(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(HostCommand::UpdateAnswer(text.into())).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::RunnerStopped` if the runner is gone.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(HostCommand::Submit(text.into())).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::RunnerStopped` if the runner is gone.
    pub async fn advance(&self) -> Result<(), SessionError> {
        self.send(HostCommand::Advance).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::RunnerStopped` if the runner is gone.
    pub async fn retry_bootstrap(&self) -> Result<(), SessionError> {
        self.send(HostCommand::RetryBootstrap).await
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes every published snapshot.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the runner and take the session back.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RunnerStopped` if the runner task panicked.
    pub async fn shutdown(self) -> Result<InterviewSession, SessionError> {
        // A closed channel means the runner already left its loop.
        let _ = self.commands.send(HostCommand::Shutdown).await;
        self.task.await.map_err(|_| SessionError::RunnerStopped)
    }
}
