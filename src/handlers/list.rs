//! List handlers for the work hours MCP server

use crate::WorkHoursServerHandler;
use crate::formatting;
use crate::handlers::require_loaded;
use mcp_attr::{Result as McpResult, bail_public};

impl WorkHoursServerHandler {
    /// Renders every day of the schedule with its numbered intervals.
    pub async fn handle_work_days(&self) -> McpResult<String> {
        let session = self.lock_session();
        require_loaded(&session)?;
        Ok(formatting::format_schedule(&session.editor, &self.config))
    }

    /// Shows the body the next save would submit.
    pub async fn handle_pending_changes(&self) -> McpResult<String> {
        let session = self.lock_session();
        require_loaded(&session)?;

        let changes = session.editor.changes();
        if changes.is_empty() {
            return Ok("No pending changes. Saving now would submit {}".to_string());
        }

        let body = match serde_json::to_string_pretty(changes) {
            Ok(body) => body,
            Err(e) => bail_public!(_, "Failed to serialize changes: {}", e),
        };
        Ok(format!("{} changed day(s):\n{}", changes.len(), body))
    }
}
