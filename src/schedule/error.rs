use super::day_key::DayKey;
use thiserror::Error;

/// Errors raised by schedule operations
///
/// Every failing operation leaves the schedule and its change set untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The day is not part of the schedule being edited.
    #[error("Day '{0}' is not part of this schedule")]
    UnknownDay(DayKey),
    /// No interval exists at the given position.
    #[error("Day '{day}' has {len} interval(s); index {index} is out of range")]
    IndexOutOfRange {
        day: DayKey,
        index: usize,
        len: usize,
    },
    /// Hour or minutes outside 0-23 / 0-59.
    #[error("Invalid time {hour}:{minutes}; hour must be 0-23 and minutes 0-59")]
    InvalidTime { hour: u32, minutes: u32 },
    /// Text that is neither a weekday index nor a YYYY-MM-DD date.
    #[error("Invalid day '{0}'. Use a weekday index 0-6 or a date in YYYY-MM-DD format")]
    InvalidDayKey(String),
    /// Weekday index outside 0-6.
    #[error("Invalid weekday {0}; weekdays are numbered 0-6")]
    InvalidWeekday(i64),
    /// A record date that could not be parsed.
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
    /// A record without a weekday, loaded into a weekday schedule.
    #[error("Record has no weekday")]
    MissingDay,
    /// A clock string that is not HH:MM.
    #[error("Invalid time '{0}'. Use HH:MM (e.g., '08:30')")]
    InvalidClock(String),
}
