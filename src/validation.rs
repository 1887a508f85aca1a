//! Validation helper functions for the work hours MCP server
//!
//! This module turns tool arguments (day keys, interval edges, clock times)
//! into typed values, reporting invalid input as MCP parameter errors.

use crate::schedule::{DayKey, Edge, ScheduleEditor, ScheduleError, parse_clock};
use mcp_attr::Result as McpResult;

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse a day argument and check it belongs to the schedule being edited
///
/// # Arguments
/// * `day_str` - Weekday index ("0"-"6") or date (YYYY-MM-DD)
/// * `editor` - The schedule the day must be part of
///
/// # Returns
/// Result containing the DayKey or an error listing the valid days
pub fn parse_day(day_str: &str, editor: &ScheduleEditor) -> McpResult<DayKey> {
    let day: DayKey = day_str
        .parse()
        .map_err(|e: ScheduleError| invalid_params(e.to_string()))?;
    if editor.intervals(&day).is_none() {
        let valid: Vec<String> = editor.days().map(|d| d.to_string()).collect();
        return Err(invalid_params(format!(
            "Day '{}' is not part of this schedule. Valid days: {}",
            day,
            valid.join(", ")
        )));
    }
    Ok(day)
}

/// Parse the interval edge ("from" or "to")
pub fn parse_edge(edge_str: &str) -> McpResult<Edge> {
    edge_str.parse::<Edge>().map_err(invalid_params)
}

/// Parse a clock time in HH:MM format
///
/// # Returns
/// Result containing (hour, minutes) or error
pub fn parse_time(time_str: &str) -> McpResult<(u32, u32)> {
    parse_clock(time_str).map_err(|e| invalid_params(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleMode;
    use chrono::NaiveDate;

    fn editor(mode: ScheduleMode) -> ScheduleEditor {
        ScheduleEditor::new(mode, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap())
    }

    #[test]
    fn test_parse_day_weekday_mode() {
        let editor = editor(ScheduleMode::Weekday);
        assert_eq!(parse_day("5", &editor).unwrap(), DayKey::Weekday(5));
        assert!(parse_day("7", &editor).is_err());
        assert!(parse_day("2024-01-08", &editor).is_err());
        assert!(parse_day("friday", &editor).is_err());
    }

    #[test]
    fn test_parse_day_specific_week_mode() {
        let editor = editor(ScheduleMode::SpecificWeek);
        assert!(parse_day("2024-01-08", &editor).is_ok());
        assert!(parse_day("2024-01-14", &editor).is_err());
        assert!(parse_day("1", &editor).is_err());
    }

    #[test]
    fn test_parse_edge() {
        assert_eq!(parse_edge("from").unwrap(), Edge::From);
        assert_eq!(parse_edge("to").unwrap(), Edge::To);
        assert!(parse_edge("start").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:45").unwrap(), (9, 45));
        assert!(parse_time("9").is_err());
        assert!(parse_time("12:61").is_err());
    }
}
