//! Wire model for the work days API
//!
//! The backend answers `GET /teacher/work_days` with `{"data": [record, ...]}` and accepts
//! the change set as the body of `POST /teacher/work_days`. This module holds the record
//! type, the fetch query with its date filter and the week arithmetic behind it.

use crate::schedule::{DATE_KEY_FORMAT, DayKey, ScheduleError, ScheduleMode, TimeInterval};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Path of the work days resource
pub const WORK_DAYS_ENDPOINT: &str = "/teacher/work_days";

/// One interval of work hours as stored by the backend
///
/// Recurring hours carry only `day`; one-off hours also carry `on_date`.
/// Numbers are kept wide so that an out-of-range value rejects the record
/// instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_date: Option<String>,
    pub from_hour: u32,
    pub from_minutes: u32,
    pub to_hour: u32,
    pub to_minutes: u32,
}

impl IntervalRecord {
    /// Build the record stored for an interval of a schedule day
    pub fn for_day(day: DayKey, interval: &TimeInterval) -> Self {
        Self {
            day: Some(i64::from(day.weekday_of())),
            on_date: match day {
                DayKey::Weekday(_) => None,
                DayKey::Date(date) => Some(date.format(DATE_KEY_FORMAT).to_string()),
            },
            from_hour: u32::from(interval.from_hour()),
            from_minutes: u32::from(interval.from_minutes()),
            to_hour: u32::from(interval.to_hour()),
            to_minutes: u32::from(interval.to_minutes()),
        }
    }

    pub fn interval(&self) -> Result<TimeInterval, ScheduleError> {
        TimeInterval::new(
            self.from_hour,
            self.from_minutes,
            self.to_hour,
            self.to_minutes,
        )
    }

    /// Calendar date of a one-off record, `None` for recurring hours
    pub fn date(&self) -> Option<Result<NaiveDate, ScheduleError>> {
        self.on_date.as_deref().map(parse_record_date)
    }

    /// Key of the day this record belongs to when editing in `mode`
    pub fn day_key(&self, mode: ScheduleMode) -> Result<DayKey, ScheduleError> {
        match mode {
            ScheduleMode::SpecificWeek => match self.date() {
                Some(date) => date.map(DayKey::Date),
                None => Err(ScheduleError::MissingDay),
            },
            ScheduleMode::Weekday => match self.day {
                Some(day) => DayKey::weekday(day),
                None => Err(ScheduleError::MissingDay),
            },
        }
    }
}

/// Parse a record date into its UTC calendar date
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps (read as UTC).
pub fn parse_record_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_KEY_FORMAT) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|timestamp| timestamp.date())
        .ok_or_else(|| ScheduleError::InvalidDate(value.to_string()))
}

/// Response envelope of the fetch request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkDaysResponse {
    #[serde(default)]
    pub data: Vec<IntervalRecord>,
}

impl WorkDaysResponse {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

/// Which records a fetch asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkDaysQuery {
    /// The recurring weekday schedule
    Recurring,
    /// One-off hours dated within an inclusive range
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl WorkDaysQuery {
    /// Query matching what an editor in `mode` loads
    pub fn for_mode(mode: ScheduleMode, week_start: NaiveDate) -> Self {
        match mode {
            ScheduleMode::Weekday => WorkDaysQuery::Recurring,
            ScheduleMode::SpecificWeek => WorkDaysQuery::DateRange {
                start: week_start,
                end: week_start + Duration::days(6),
            },
        }
    }

    /// Query string appended to the endpoint, including the leading `?`
    pub fn query_string(&self) -> String {
        match self {
            WorkDaysQuery::Recurring => String::new(),
            WorkDaysQuery::DateRange { start, end } => format!(
                "?on_date=ge:{}&on_date=le:{}",
                start.format(DATE_KEY_FORMAT),
                end.format(DATE_KEY_FORMAT)
            ),
        }
    }

    /// Request path for the fetch
    pub fn path(&self) -> String {
        format!("{}{}", WORK_DAYS_ENDPOINT, self.query_string())
    }

    /// Whether a stored record is selected by this query
    pub fn matches(&self, record: &IntervalRecord) -> bool {
        match self {
            WorkDaysQuery::Recurring => record.on_date.is_none(),
            WorkDaysQuery::DateRange { start, end } => match record.date() {
                Some(Ok(date)) => *start <= date && date <= *end,
                _ => false,
            },
        }
    }
}

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the week containing `today`
///
/// # Arguments
/// * `today` - Any date in the week
/// * `first_day` - Weekday the week starts on
pub fn week_start(today: NaiveDate, first_day: Weekday) -> NaiveDate {
    let offset =
        (7 + today.weekday().num_days_from_monday() - first_day.num_days_from_monday()) % 7;
    today - Duration::days(i64::from(offset))
}
