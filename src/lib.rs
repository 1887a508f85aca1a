//! Work Hours MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for editing a teacher's
//! work hours: a recurring weekly schedule, or one-off hours for the dates of the
//! current week. Edits are tracked per day, and a save submits only the days that changed.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `WorkHoursServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `schedule` module - Change-tracked schedule editor
//! - **Backend Layer**: `storage` module - `WorkDaysBackend` trait with a TOML file store
//!
//! # Example
//!
//! ```no_run
//! use work_hours_mcp::{Config, ScheduleMode, WorkHoursServerHandler};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler =
//!         WorkHoursServerHandler::with_storage("work_days.toml", ScheduleMode::Weekday, Config::default())?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod formatting;
mod handlers;
pub mod records;
pub mod schedule;
pub mod storage;
pub mod validation;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

// Re-export commonly used types
pub use config::{Config, load_config};
pub use records::{IntervalRecord, WorkDaysQuery, local_date_today, week_start};
pub use schedule::{
    ChangeSet, DayKey, Edge, LoadReport, ScheduleEditor, ScheduleError, ScheduleMode,
    TimeInterval,
};
pub use storage::{Storage, WorkDaysBackend};

/// Whether the editor reflects the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loaded,
    /// The last fetch failed; the editor is empty
    Failed(String),
}

/// One editing session: the editor plus the outcome of its last load
pub struct Session {
    pub editor: ScheduleEditor,
    pub load_state: LoadState,
}

/// MCP Server handler for work hours editing
///
/// Owns one schedule editor behind a mutex, so tool calls never interleave. Loads and
/// saves go through the configured [`WorkDaysBackend`] while the session is locked.
pub struct WorkHoursServerHandler {
    pub(crate) session: Mutex<Session>,
    pub(crate) backend: Box<dyn WorkDaysBackend + Send + Sync>,
    pub(crate) config: Config,
}

impl WorkHoursServerHandler {
    /// Create a handler and load the schedule from the backend
    ///
    /// A failed load is not fatal: it is logged, the schedule stays empty and editing
    /// tools refuse to run until `reload` succeeds.
    ///
    /// # Arguments
    /// * `backend` - Where work hours are fetched from and saved to
    /// * `mode` - Recurring weekday schedule or the current week's dates
    /// * `config` - Week start, default interval and display settings
    /// * `today` - Any date of the week edited in `ScheduleMode::SpecificWeek`
    pub fn new(
        backend: Box<dyn WorkDaysBackend + Send + Sync>,
        mode: ScheduleMode,
        config: Config,
        today: NaiveDate,
    ) -> Result<Self> {
        if !config.date_format_is_valid() {
            bail!(
                "Invalid display_date_format '{}'",
                config.display_date_format
            );
        }
        let mut editor = ScheduleEditor::new(mode, week_start(today, config.week_starts_on))
            .with_default_interval(config.default_interval()?);
        let load_state = match fetch_schedule(backend.as_ref(), &mut editor) {
            Ok(_) => LoadState::Loaded,
            Err(e) => {
                warn!("{:#}", e);
                LoadState::Failed(format!("{:#}", e))
            }
        };
        Ok(Self {
            session: Mutex::new(Session { editor, load_state }),
            backend,
            config,
        })
    }

    /// Create a handler backed by a TOML file, editing the week containing today
    ///
    /// # Example
    /// ```no_run
    /// # use work_hours_mcp::{Config, ScheduleMode, WorkHoursServerHandler};
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = WorkHoursServerHandler::with_storage(
    ///     "work_days.toml",
    ///     ScheduleMode::SpecificWeek,
    ///     Config::default(),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_storage(
        file_path: impl AsRef<Path>,
        mode: ScheduleMode,
        config: Config,
    ) -> Result<Self> {
        Self::new(
            Box::new(Storage::new(file_path)),
            mode,
            config,
            local_date_today(),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the editor, including pending changes
    pub fn editor(&self) -> ScheduleEditor {
        self.lock_session().editor.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.lock_session().load_state.clone()
    }

    /// Re-initialize the editor and fill it from the backend
    ///
    /// Pending changes are discarded. On failure the editor stays empty and the
    /// session is marked as failed.
    pub fn load(&self) -> Result<LoadReport> {
        let mut session = self.lock_session();
        self.load_into(&mut session)
    }

    pub(crate) fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn load_into(&self, session: &mut Session) -> Result<LoadReport> {
        let result = fetch_schedule(self.backend.as_ref(), &mut session.editor);
        session.load_state = match &result {
            Ok(_) => LoadState::Loaded,
            Err(e) => LoadState::Failed(format!("{:#}", e)),
        };
        result
    }
}

/// Reset the editor and fill it with the backend's records for its mode and week
fn fetch_schedule(
    backend: &dyn WorkDaysBackend,
    editor: &mut ScheduleEditor,
) -> Result<LoadReport> {
    editor.reset();
    let query = WorkDaysQuery::for_mode(editor.mode(), editor.week_start());
    let records = backend
        .fetch(&query)
        .with_context(|| format!("Failed to load work hours from {}", query.path()))?;
    let report = editor.load_intervals(&records);
    info!(
        path = %query.path(),
        placed = report.placed,
        skipped_recurring = report.skipped_recurring,
        dated_as_recurring = report.dated_as_recurring,
        rejected = report.rejected.len(),
        "Loaded work hours"
    );
    Ok(report)
}

/// Work hours editor for a tutoring teacher.
///
/// The schedule has seven days. In weekday mode days are keyed "0"-"6" (0 = Sunday) and
/// describe the recurring weekly hours; in week mode days are keyed by date (YYYY-MM-DD)
/// and hold one-off hours for the current week. Each day holds an ordered list of
/// intervals, addressed by index.
///
/// Workflow: work_days to review → add_hours / set_hours / remove_hours to edit →
/// pending_changes to review → save. Only changed days are sent, each with its full list.
#[mcp_server]
impl McpServer for WorkHoursServerHandler {
    /// **Review**: Show every day with its numbered intervals. Days with unsaved edits are marked *.
    #[tool]
    async fn work_days(&self) -> McpResult<String> {
        self.handle_work_days().await
    }

    /// **Add**: Append the default interval (08:00-17:00 unless configured) to a day.
    /// **Next**: Adjust it with set_hours.
    #[tool]
    async fn add_hours(
        &self,
        /// Day: weekday "0"-"6" (0 = Sunday) or date YYYY-MM-DD in week mode
        day: String,
    ) -> McpResult<String> {
        self.handle_add_hours(day).await
    }

    /// **Remove**: Delete one interval of a day. Removing the last one clears the day.
    #[tool]
    async fn remove_hours(
        &self,
        /// Day: weekday "0"-"6" or date YYYY-MM-DD
        day: String,
        /// Index of the interval as shown by work_days
        index: u32,
    ) -> McpResult<String> {
        self.handle_remove_hours(day, index).await
    }

    /// **Edit**: Change the start ("from") or end ("to") of one interval. The other end is kept.
    #[tool]
    async fn set_hours(
        &self,
        /// Day: weekday "0"-"6" or date YYYY-MM-DD
        day: String,
        /// Index of the interval as shown by work_days
        index: u32,
        /// Edge to change: from/to
        edge: String,
        /// New time HH:MM (24-hour)
        time: String,
    ) -> McpResult<String> {
        self.handle_set_hours(day, index, edge, time).await
    }

    /// **Review changes**: Show the request body save would submit (changed days only).
    #[tool]
    async fn pending_changes(&self) -> McpResult<String> {
        self.handle_pending_changes().await
    }

    /// **Save**: Submit the changed days. On failure the changes are kept so save can be retried.
    #[tool]
    async fn save(&self) -> McpResult<String> {
        self.handle_save().await
    }

    /// **Reload**: Discard unsaved changes and fetch the schedule again.
    #[tool]
    async fn reload(&self) -> McpResult<String> {
        self.handle_reload().await
    }
}
