//! Editing handlers for the work hours MCP server
//!
//! Every edit updates the day's intervals and its entry in the change set together.

use crate::WorkHoursServerHandler;
use crate::formatting;
use crate::handlers::require_loaded;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl WorkHoursServerHandler {
    /// Appends the default interval to a day.
    pub async fn handle_add_hours(&self, day: String) -> McpResult<String> {
        let mut session = self.lock_session();
        require_loaded(&session)?;
        let day = validation::parse_day(&day, &session.editor)?;

        let (index, interval) = match session.editor.add_interval(&day) {
            Ok(intervals) => (intervals.len() - 1, intervals[intervals.len() - 1]),
            Err(e) => bail_public!(_, "{}", e),
        };

        Ok(format!(
            "Added {} to {} at index {}",
            interval,
            formatting::format_day_label(&day, &self.config),
            index
        ))
    }

    /// Removes one interval from a day.
    pub async fn handle_remove_hours(&self, day: String, index: u32) -> McpResult<String> {
        let mut session = self.lock_session();
        require_loaded(&session)?;
        let day = validation::parse_day(&day, &session.editor)?;

        let removed = match session.editor.remove_interval(&day, index as usize) {
            Ok(removed) => removed,
            Err(e) => bail_public!(_, "{}", e),
        };

        let remaining = session.editor.intervals(&day).map_or(0, <[_]>::len);
        Ok(format!(
            "Removed {} from {} ({} interval(s) left)",
            removed,
            formatting::format_day_label(&day, &self.config),
            remaining
        ))
    }

    /// Changes the start or end of one interval.
    pub async fn handle_set_hours(
        &self,
        day: String,
        index: u32,
        edge: String,
        time: String,
    ) -> McpResult<String> {
        let mut session = self.lock_session();
        require_loaded(&session)?;
        let day = validation::parse_day(&day, &session.editor)?;
        let edge = validation::parse_edge(&edge)?;
        let (hour, minutes) = validation::parse_time(&time)?;

        let updated =
            match session
                .editor
                .set_interval_bound(&day, index as usize, edge, hour, minutes)
            {
                Ok(updated) => updated,
                Err(e) => bail_public!(_, "{}", e),
            };

        Ok(format!(
            "Interval {} of {} is now {}",
            index,
            formatting::format_day_label(&day, &self.config),
            updated
        ))
    }
}
