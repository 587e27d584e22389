#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use interview_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    Advance, BootstrapOutcome, CompletionFinalizer, HostCommand, InterviewRunner,
    InterviewSession, RearmPolicy, RunnerHandle, SessionBootstrapper, SessionProgress,
    SessionSnapshot, SubmissionCoordinator, SubmissionTicket, TickOutcome,
};
