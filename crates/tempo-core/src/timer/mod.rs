mod driver;
mod session;

pub use driver::{DriverCommand, SessionDriver};
pub use session::{
    format_clock, Command, Completion, Effect, Phase, Session, SessionSnapshot, SessionState,
    BREAK_INTERVAL_SECS, BREAK_MIN_REMAINING_SECS, REMINDER_THRESHOLD_SECS, WORK_INTERVAL_SECS,
};
