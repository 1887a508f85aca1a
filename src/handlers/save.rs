//! Save and reload handlers for the work hours MCP server

use crate::WorkHoursServerHandler;
use crate::formatting;
use crate::handlers::require_loaded;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::warn;

impl WorkHoursServerHandler {
    /// Submits the change set, then reloads so the editor matches the backend.
    ///
    /// A failed submission keeps the change set for a retry.
    pub async fn handle_save(&self) -> McpResult<String> {
        let mut session = self.lock_session();
        require_loaded(&session)?;

        let changes = session.editor.changes().clone();
        if let Err(e) = self.backend.save(&changes) {
            warn!(days = changes.len(), "Saving work hours failed: {:#}", e);
            bail_public!(
                _,
                "Failed to save: {:#}. Changes in {} day(s) are kept; run save again to retry.",
                e,
                changes.len()
            );
        }

        let saved = if changes.is_empty() {
            "Nothing to save; submitted an empty change set".to_string()
        } else {
            format!("Saved {} changed day(s)", changes.len())
        };

        match self.load_into(&mut session) {
            Ok(_) => Ok(saved),
            Err(e) => Ok(format!(
                "{}, but reloading failed: {:#}. Run reload to try again.",
                saved, e
            )),
        }
    }

    /// Discards pending changes and loads the schedule again.
    pub async fn handle_reload(&self) -> McpResult<String> {
        let mut session = self.lock_session();
        let discarded = session.editor.changes().len();

        let report = match self.load_into(&mut session) {
            Ok(report) => report,
            Err(e) => bail_public!(_, "{:#}", e),
        };

        let mut result = String::new();
        if discarded > 0 {
            result.push_str(&format!(
                "Discarded unsaved changes in {} day(s). ",
                discarded
            ));
        }
        result.push_str(&formatting::format_load_report(&report));
        Ok(result)
    }
}
