//! Formatting helper functions for the work hours MCP server
//!
//! This module renders the schedule and load results as text for tool output.

use crate::config::Config;
use crate::schedule::{DATE_KEY_FORMAT, DayKey, LoadReport, ScheduleEditor, ScheduleMode};
use chrono::Duration;

/// Label of a day: its name, plus the short date when the day is a calendar date
pub fn format_day_label(day: &DayKey, config: &Config) -> String {
    let name = config.day_name(day.weekday_of());
    match day {
        DayKey::Weekday(_) => name,
        DayKey::Date(date) => format!(
            "{} ({})",
            name,
            date.format(&config.display_date_format)
        ),
    }
}

/// Title of the schedule listing for the editor's mode
pub fn format_title(editor: &ScheduleEditor) -> String {
    match editor.mode() {
        ScheduleMode::Weekday => "Work hours (every week)".to_string(),
        ScheduleMode::SpecificWeek => {
            let start = editor.week_start();
            let end = start + Duration::days(6);
            format!(
                "Work hours for the week of {} to {}",
                start.format(DATE_KEY_FORMAT),
                end.format(DATE_KEY_FORMAT)
            )
        }
    }
}

/// Render every day with its indexed intervals
///
/// # Description
/// Days with unsaved edits are marked with `*`. Each day line also shows the key
/// to pass to the editing tools.
pub fn format_schedule(editor: &ScheduleEditor, config: &Config) -> String {
    let mut result = format!("{}\n", format_title(editor));

    if editor.has_changes() {
        result.push_str(&format!(
            "Unsaved changes in {} day(s), marked with *\n",
            editor.changes().len()
        ));
    }

    for (day, intervals) in editor.state() {
        let marker = if editor.changes().contains(day) {
            " *"
        } else {
            ""
        };
        result.push_str(&format!(
            "\n{} [day: {}]{}\n",
            format_day_label(day, config),
            day,
            marker
        ));

        if intervals.is_empty() {
            result.push_str("  (no hours)\n");
        }
        for (index, interval) in intervals.iter().enumerate() {
            result.push_str(&format!("  [{}] {}\n", index, interval));
        }
    }

    result
}

/// Summarize a load for the client
pub fn format_load_report(report: &LoadReport) -> String {
    let mut result = format!("Loaded {} interval(s)", report.placed);
    if report.skipped_recurring > 0 {
        result.push_str(&format!(
            ", ignored {} recurring interval(s)",
            report.skipped_recurring
        ));
    }
    if report.dated_as_recurring > 0 {
        result.push_str(&format!(
            ", {} of them dated (saving their day makes them recurring)",
            report.dated_as_recurring
        ));
    }
    if !report.rejected.is_empty() {
        result.push_str(&format!(
            ", skipped {} invalid record(s):",
            report.rejected.len()
        ));
        for rejected in &report.rejected {
            result.push_str(&format!(
                "\n- record {}: {}",
                rejected.position, rejected.reason
            ));
        }
    }
    result
}
