use super::day_key::{DayKey, ScheduleMode};
use super::error::ScheduleError;
use super::interval::{Edge, TimeInterval};
use crate::records::IntervalRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Intervals of every day in the schedule, in display order
pub type ScheduleState = BTreeMap<DayKey, Vec<TimeInterval>>;

/// Days modified since the last load, each with its full interval list
///
/// The backend replaces whole days, so a touched day always carries every interval
/// it currently has; an empty list means all intervals of that day were removed.
/// Serializes to the save request body, e.g. `{"3": [{"from_hour": 8, ...}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet(BTreeMap<DayKey, Vec<TimeInterval>>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day: &DayKey) -> Option<&[TimeInterval]> {
        self.0.get(day).map(Vec::as_slice)
    }

    pub fn contains(&self, day: &DayKey) -> bool {
        self.0.contains_key(day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayKey> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DayKey, &[TimeInterval])> {
        self.0.iter().map(|(day, intervals)| (day, intervals.as_slice()))
    }

    /// Replace the recorded intervals of a day
    pub fn insert(&mut self, day: DayKey, intervals: Vec<TimeInterval>) {
        self.0.insert(day, intervals);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The exact JSON body submitted to the backend; `{}` when nothing changed
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A record that could not be placed during a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position of the record in the loaded sequence
    pub position: usize,
    pub reason: ScheduleError,
}

/// Outcome of loading records into the schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records appended to a day
    pub placed: usize,
    /// Recurring records ignored while editing a specific week
    pub skipped_recurring: usize,
    /// Dated records placed by their weekday in the recurring schedule
    ///
    /// Saving such a day writes them back as recurring hours.
    pub dated_as_recurring: usize,
    /// Records that were malformed or keyed outside the schedule
    pub rejected: Vec<RejectedRecord>,
}

/// Change-tracked weekly schedule
///
/// Holds the intervals of seven days, keyed by weekday or by the dates of one week,
/// and records which days the user touched. Every mutation updates the schedule and
/// the change set in the same call; a failing mutation changes neither.
#[derive(Debug, Clone)]
pub struct ScheduleEditor {
    mode: ScheduleMode,
    week_start: NaiveDate,
    default_interval: TimeInterval,
    state: ScheduleState,
    changes: ChangeSet,
}

impl ScheduleEditor {
    /// Create an empty schedule for the mode
    ///
    /// # Arguments
    /// * `mode` - Weekday keys 0-6, or the seven dates of a week
    /// * `week_start` - First date of the week; only used by `ScheduleMode::SpecificWeek`
    pub fn new(mode: ScheduleMode, week_start: NaiveDate) -> Self {
        let mut editor = Self {
            mode,
            week_start,
            default_interval: TimeInterval::default(),
            state: ScheduleState::new(),
            changes: ChangeSet::new(),
        };
        editor.reset();
        editor
    }

    /// Use a different interval for `add_interval`
    pub fn with_default_interval(mut self, interval: TimeInterval) -> Self {
        self.default_interval = interval;
        self
    }

    /// Re-initialize: every day empty, no pending changes
    pub fn reset(&mut self) {
        self.state = DayKey::keys_for(self.mode, self.week_start)
            .into_iter()
            .map(|day| (day, Vec::new()))
            .collect();
        self.changes.clear();
    }

    pub fn mode(&self) -> ScheduleMode {
        self.mode
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn default_interval(&self) -> TimeInterval {
        self.default_interval
    }

    /// Day keys in display order
    pub fn days(&self) -> impl Iterator<Item = &DayKey> {
        self.state.keys()
    }

    pub fn intervals(&self, day: &DayKey) -> Option<&[TimeInterval]> {
        self.state.get(day).map(Vec::as_slice)
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Append fetched records to their days
    ///
    /// While editing a specific week, records without a date are recurring hours and
    /// are skipped. Records that cannot be placed are logged and reported, never fatal.
    /// Loading does not mark any day as changed.
    pub fn load_intervals(&mut self, records: &[IntervalRecord]) -> LoadReport {
        let mut report = LoadReport::default();

        for (position, record) in records.iter().enumerate() {
            if self.mode == ScheduleMode::SpecificWeek && record.on_date.is_none() {
                report.skipped_recurring += 1;
                continue;
            }

            match self.place(record) {
                Ok(day) => {
                    debug!(%day, position, "Placed work hours record");
                    report.placed += 1;
                    if self.mode == ScheduleMode::Weekday && record.on_date.is_some() {
                        debug!(%day, position, "Dated record placed in the recurring schedule");
                        report.dated_as_recurring += 1;
                    }
                }
                Err(reason) => {
                    warn!(position, %reason, "Skipping work hours record");
                    report.rejected.push(RejectedRecord { position, reason });
                }
            }
        }

        report
    }

    fn place(&mut self, record: &IntervalRecord) -> Result<DayKey, ScheduleError> {
        let day = record.day_key(self.mode)?;
        let interval = record.interval()?;
        self.day_mut(&day)?.push(interval);
        Ok(day)
    }

    /// Append the default interval to a day
    ///
    /// # Returns
    /// The day's intervals after the append
    pub fn add_interval(&mut self, day: &DayKey) -> Result<&[TimeInterval], ScheduleError> {
        let interval = self.default_interval;
        self.day_mut(day)?.push(interval);
        debug!(%day, %interval, "Added interval");
        Ok(self.record_change(day))
    }

    /// Remove the interval at `index` from a day
    ///
    /// # Returns
    /// The removed interval
    pub fn remove_interval(
        &mut self,
        day: &DayKey,
        index: usize,
    ) -> Result<TimeInterval, ScheduleError> {
        let intervals = self.day_mut(day)?;
        if index >= intervals.len() {
            return Err(ScheduleError::IndexOutOfRange {
                day: *day,
                index,
                len: intervals.len(),
            });
        }
        let removed = intervals.remove(index);
        debug!(%day, index, interval = %removed, "Removed interval");
        self.record_change(day);
        Ok(removed)
    }

    /// Replace one edge of the interval at `index`, keeping the other edge
    ///
    /// # Returns
    /// The updated interval
    pub fn set_interval_bound(
        &mut self,
        day: &DayKey,
        index: usize,
        edge: Edge,
        hour: u32,
        minutes: u32,
    ) -> Result<TimeInterval, ScheduleError> {
        let intervals = self.day_mut(day)?;
        let len = intervals.len();
        let slot = intervals
            .get_mut(index)
            .ok_or(ScheduleError::IndexOutOfRange {
                day: *day,
                index,
                len,
            })?;
        let updated = slot.with_bound(edge, hour, minutes)?;
        *slot = updated;
        debug!(%day, index, ?edge, interval = %updated, "Updated interval");
        self.record_change(day);
        Ok(updated)
    }

    fn day_mut(&mut self, day: &DayKey) -> Result<&mut Vec<TimeInterval>, ScheduleError> {
        self.state
            .get_mut(day)
            .ok_or(ScheduleError::UnknownDay(*day))
    }

    /// Copy the day's full interval list into the change set
    fn record_change(&mut self, day: &DayKey) -> &[TimeInterval] {
        let intervals = self.state.get(day).map(Vec::as_slice).unwrap_or(&[]);
        self.changes.insert(*day, intervals.to_vec());
        intervals
    }
}
