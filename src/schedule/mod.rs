//! Work hours domain model
//!
//! This module contains the change-tracked weekly schedule behind the work days screen.
//! It is split into submodules:
//! - `day_key`: weekday / calendar date keys
//! - `interval`: time intervals and their edges
//! - `editor`: the schedule editor with its change set
//! - `error`: errors raised by editor operations

mod day_key;
mod editor;
mod error;
mod interval;

// Re-export all public types
pub use day_key::{DATE_KEY_FORMAT, DAYS_IN_WEEK, DayKey, ScheduleMode};
pub use editor::{ChangeSet, LoadReport, RejectedRecord, ScheduleEditor, ScheduleState};
pub use error::ScheduleError;
pub use interval::{Edge, TimeInterval, parse_clock};
