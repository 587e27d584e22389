mod feedback_vm;
mod session_summary_vm;
mod session_vm;
mod time_fmt;

pub use feedback_vm::FeedbackVm;
pub use session_summary_vm::{SessionSummaryVm, map_session_summary};
pub use session_vm::{SessionPhase, SessionVm};
pub use time_fmt::{format_datetime, format_duration, format_timer, is_low_time};
