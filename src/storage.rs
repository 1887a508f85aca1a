use crate::records::{IntervalRecord, WorkDaysQuery};
use crate::schedule::{ChangeSet, DayKey};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Current format version of the work hours file
const FORMAT_VERSION: u32 = 1;

fn format_version() -> u32 {
    FORMAT_VERSION
}

/// Source and destination of work hours
///
/// Mirrors the two requests of the work days API: a fetch filtered by
/// [`WorkDaysQuery`] and a save that replaces every day present in the change set.
///
/// A recurring fetch should return only undated records. Dated records in that result
/// are placed by their weekday, and saving that weekday stores them as recurring hours.
pub trait WorkDaysBackend {
    fn fetch(&self, query: &WorkDaysQuery) -> Result<Vec<IntervalRecord>>;

    fn save(&self, changes: &ChangeSet) -> Result<()>;
}

/// Contents of the work hours file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkDaysFile {
    #[serde(default = "format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub records: Vec<IntervalRecord>,
}

impl Default for WorkDaysFile {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            records: Vec::new(),
        }
    }
}

impl WorkDaysFile {
    /// Replace the records of every day in the change set with its intervals
    pub fn apply(&mut self, changes: &ChangeSet) {
        for (day, intervals) in changes.iter() {
            match day {
                DayKey::Weekday(weekday) => {
                    let weekday = i64::from(*weekday);
                    self.records
                        .retain(|r| r.on_date.is_some() || r.day != Some(weekday));
                }
                DayKey::Date(date) => {
                    self.records
                        .retain(|r| !matches!(r.date(), Some(Ok(d)) if d == *date));
                }
            }
            self.records.extend(
                intervals
                    .iter()
                    .map(|interval| IntervalRecord::for_day(*day, interval)),
            );
        }
    }
}

/// TOML file backend for work hours
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Read the file; a missing file is an empty store
    pub fn load(&self) -> Result<WorkDaysFile> {
        if !self.file_path.exists() {
            return Ok(WorkDaysFile::default());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let data: WorkDaysFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        Ok(data)
    }

    /// Write the file through a temporary sibling so readers never see a partial file
    pub fn write(&self, data: &WorkDaysFile) -> Result<()> {
        let content = toml::to_string_pretty(data)?;
        let tmp_path = self.file_path.with_extension("tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        if let Err(e) = fs::rename(&tmp_path, &self.file_path) {
            fs::remove_file(&tmp_path).ok();
            return Err(e)
                .with_context(|| format!("Failed to replace {}", self.file_path.display()));
        }
        Ok(())
    }
}

impl WorkDaysBackend for Storage {
    fn fetch(&self, query: &WorkDaysQuery) -> Result<Vec<IntervalRecord>> {
        let data = self.load()?;
        Ok(data
            .records
            .into_iter()
            .filter(|record| query.matches(record))
            .collect())
    }

    fn save(&self, changes: &ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut data = self.load()?;
        data.apply(changes);
        self.write(&data)?;
        info!(
            days = changes.len(),
            path = %self.file_path.display(),
            "Saved work hours"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ScheduleEditor, ScheduleMode, TimeInterval};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_file() -> WorkDaysFile {
        let interval = TimeInterval::new(9, 0, 12, 0).unwrap();
        WorkDaysFile {
            format_version: FORMAT_VERSION,
            records: vec![
                IntervalRecord::for_day(DayKey::Weekday(3), &interval),
                IntervalRecord::for_day(DayKey::Weekday(3), &interval),
                IntervalRecord::for_day(DayKey::Weekday(4), &interval),
                IntervalRecord::for_day(DayKey::Date(date(2024, 1, 10)), &interval),
                IntervalRecord::for_day(DayKey::Date(date(2024, 1, 11)), &interval),
            ],
        }
    }

    #[test]
    fn test_storage_load_nonexistent() -> Result<()> {
        let dir = tempdir()?;
        let storage = Storage::new(dir.path().join("nonexistent.toml"));

        let data = storage.load()?;
        assert!(data.records.is_empty());
        assert_eq!(data.format_version, FORMAT_VERSION);
        Ok(())
    }

    #[test]
    fn test_storage_write_load() -> Result<()> {
        let dir = tempdir()?;
        let storage = Storage::new(dir.path().join("work_days.toml"));

        storage.write(&seeded_file())?;
        assert_eq!(storage.load()?, seeded_file());
        assert!(!dir.path().join("work_days.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_storage_write_failure_removes_temp_file() -> Result<()> {
        let dir = tempdir()?;
        // a non-empty directory cannot be replaced by a file
        let target = dir.path().join("work_days");
        fs::create_dir(&target)?;
        fs::write(target.join("keep"), "")?;
        let storage = Storage::new(&target);

        assert!(storage.write(&seeded_file()).is_err());
        assert!(!dir.path().join("work_days.tmp").exists());
        assert!(target.join("keep").exists());
        Ok(())
    }

    #[test]
    fn test_fetch_filters_by_query() -> Result<()> {
        let dir = tempdir()?;
        let storage = Storage::new(dir.path().join("work_days.toml"));
        storage.write(&seeded_file())?;

        let recurring = storage.fetch(&WorkDaysQuery::Recurring)?;
        assert_eq!(recurring.len(), 3);
        assert!(recurring.iter().all(|r| r.on_date.is_none()));

        let week = storage.fetch(&WorkDaysQuery::DateRange {
            start: date(2024, 1, 11),
            end: date(2024, 1, 17),
        })?;
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].on_date.as_deref(), Some("2024-01-11"));
        Ok(())
    }

    #[test]
    fn test_apply_weekday_replaces_only_recurring_day() {
        let mut file = seeded_file();
        let mut editor = ScheduleEditor::new(ScheduleMode::Weekday, date(2024, 1, 7));
        editor.add_interval(&DayKey::Weekday(3)).unwrap();

        file.apply(editor.changes());

        let wednesday: Vec<&IntervalRecord> = file
            .records
            .iter()
            .filter(|r| r.on_date.is_none() && r.day == Some(3))
            .collect();
        assert_eq!(wednesday.len(), 1);
        assert_eq!(wednesday[0].from_hour, 8);
        // The dated Wednesday override is untouched
        assert!(
            file.records
                .iter()
                .any(|r| r.on_date.as_deref() == Some("2024-01-10"))
        );
        assert_eq!(file.records.len(), 4);
    }

    #[test]
    fn test_apply_empty_day_removes_all_intervals() {
        let mut file = seeded_file();
        let mut changes = ChangeSet::new();
        changes.insert(DayKey::Weekday(3), Vec::new());
        changes.insert(DayKey::Date(date(2024, 1, 11)), Vec::new());

        file.apply(&changes);

        assert_eq!(file.records.len(), 2);
        assert!(file.records.iter().any(|r| r.day == Some(4)));
        assert!(
            file.records
                .iter()
                .any(|r| r.on_date.as_deref() == Some("2024-01-10"))
        );
    }

    #[test]
    fn test_save_round_trips_through_fetch() -> Result<()> {
        let dir = tempdir()?;
        let storage = Storage::new(dir.path().join("work_days.toml"));
        let week_start = date(2024, 1, 7);

        let mut editor = ScheduleEditor::new(ScheduleMode::SpecificWeek, week_start);
        let tuesday = DayKey::Date(date(2024, 1, 9));
        editor.add_interval(&tuesday)?;
        editor.add_interval(&tuesday)?;
        editor.set_interval_bound(&tuesday, 1, crate::schedule::Edge::From, 18, 0)?;
        storage.save(editor.changes())?;

        let query = WorkDaysQuery::for_mode(ScheduleMode::SpecificWeek, week_start);
        let mut reloaded = ScheduleEditor::new(ScheduleMode::SpecificWeek, week_start);
        let report = reloaded.load_intervals(&storage.fetch(&query)?);
        assert_eq!(report.placed, 2);
        assert_eq!(reloaded.intervals(&tuesday), editor.intervals(&tuesday));

        // Recurring schedule stays empty
        assert!(storage.fetch(&WorkDaysQuery::Recurring)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_empty_change_set_does_not_create_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("work_days.toml");
        let storage = Storage::new(&path);

        storage.save(&ChangeSet::new())?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_load_corrupt_file_fails() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("work_days.toml");
        fs::write(&path, "records = \"not a list\"")?;

        let storage = Storage::new(&path);
        assert!(storage.fetch(&WorkDaysQuery::Recurring).is_err());
        Ok(())
    }
}
