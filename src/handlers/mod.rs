//! MCP tool handlers for the work hours server
//!
//! This module contains the implementation of all MCP tool handlers.
//! Each group of tools is in a separate file.

pub mod edit;
pub mod list;
pub mod save;

use crate::{LoadState, Session};
use mcp_attr::{Result as McpResult, bail_public};

/// Refuse to touch a schedule that does not reflect the backend
///
/// Saving edits made on top of a failed load would replace the backend's days
/// with whatever was typed into an empty schedule.
pub(crate) fn require_loaded(session: &Session) -> McpResult<()> {
    match &session.load_state {
        LoadState::Loaded => Ok(()),
        LoadState::Failed(reason) => {
            bail_public!(
                _,
                "Work hours could not be loaded: {}. Run reload to try again.",
                reason
            )
        }
    }
}
