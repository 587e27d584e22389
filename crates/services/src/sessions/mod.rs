mod bootstrap;
mod finalizer;
mod progress;
mod service;
mod submission;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use bootstrap::{BootstrapOutcome, SessionBootstrapper};
pub use finalizer::CompletionFinalizer;
pub use progress::SessionProgress;
pub use service::{Advance, InterviewSession, TickOutcome};
pub use submission::{RearmPolicy, ScoringFuture, SubmissionCoordinator, SubmissionTicket};
pub use view::SessionSnapshot;
pub use workflow::{HostCommand, InterviewRunner, RunnerHandle};
