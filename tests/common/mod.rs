//! Common test utilities for integration tests

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use work_hours_mcp::{
    ChangeSet, Config, IntervalRecord, ScheduleMode, Storage, WorkDaysBackend, WorkDaysQuery,
    WorkHoursServerHandler,
};

/// A Wednesday; its Sunday-first week runs 2024-01-07 to 2024-01-13
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Create a test handler with temporary file storage
pub fn get_test_handler(mode: ScheduleMode) -> (WorkHoursServerHandler, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::new(temp_dir.path().join("work_days.toml"));
    let handler =
        WorkHoursServerHandler::new(Box::new(storage), mode, Config::default(), test_today())
            .unwrap();
    (handler, temp_dir)
}

/// Create a record with the given hours
pub fn record(day: Option<i64>, on_date: Option<&str>, from: (u32, u32), to: (u32, u32)) -> IntervalRecord {
    IntervalRecord {
        day,
        on_date: on_date.map(str::to_string),
        from_hour: from.0,
        from_minutes: from.1,
        to_hour: to.0,
        to_minutes: to.1,
    }
}

/// In-memory backend whose fetch and save can be made to fail
#[derive(Clone, Default)]
pub struct FlakyBackend {
    pub records: Arc<Mutex<Vec<IntervalRecord>>>,
    pub saved: Arc<Mutex<Vec<ChangeSet>>>,
    pub fail_fetch: Arc<Mutex<bool>>,
    pub fail_save: Arc<Mutex<bool>>,
}

impl FlakyBackend {
    pub fn with_records(records: Vec<IntervalRecord>) -> Self {
        let backend = Self::default();
        *backend.records.lock().unwrap() = records;
        backend
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        *self.fail_fetch.lock().unwrap() = fail;
    }

    pub fn set_fail_save(&self, fail: bool) {
        *self.fail_save.lock().unwrap() = fail;
    }

    pub fn saved(&self) -> Vec<ChangeSet> {
        self.saved.lock().unwrap().clone()
    }
}

impl WorkDaysBackend for FlakyBackend {
    fn fetch(&self, query: &WorkDaysQuery) -> Result<Vec<IntervalRecord>> {
        if *self.fail_fetch.lock().unwrap() {
            return Err(anyhow!("connection refused"));
        }
        let records = self.records.lock().unwrap();
        Ok(records.iter().filter(|r| query.matches(r)).cloned().collect())
    }

    fn save(&self, changes: &ChangeSet) -> Result<()> {
        if *self.fail_save.lock().unwrap() {
            return Err(anyhow!("503 service unavailable"));
        }
        self.saved.lock().unwrap().push(changes.clone());
        Ok(())
    }
}

/// Create a handler around a shared FlakyBackend
pub fn get_flaky_handler(
    mode: ScheduleMode,
    backend: &FlakyBackend,
) -> WorkHoursServerHandler {
    WorkHoursServerHandler::new(
        Box::new(backend.clone()),
        mode,
        Config::default(),
        test_today(),
    )
    .unwrap()
}
