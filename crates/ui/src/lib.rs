pub mod render;
pub mod vm;

pub use render::{render_feedback, render_session, render_summary};
pub use vm::{FeedbackVm, SessionPhase, SessionSummaryVm, SessionVm, map_session_summary};
