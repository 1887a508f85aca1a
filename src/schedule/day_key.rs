use super::error::ScheduleError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Date format used for date keys and for the backend's date filters
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Number of days in a schedule
pub const DAYS_IN_WEEK: u8 = 7;

/// Key of one day in the schedule
///
/// A recurring schedule is keyed by weekday index (0 = Sunday, as the backend numbers days),
/// a specific week by calendar date. The textual form is the bare index (`"3"`) or the
/// date as `YYYY-MM-DD`; this is also how keys appear in the save payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayKey {
    Weekday(u8),
    Date(NaiveDate),
}

impl DayKey {
    /// Create a weekday key, rejecting indexes outside 0-6
    pub fn weekday(index: i64) -> Result<Self, ScheduleError> {
        match u8::try_from(index) {
            Ok(day) if day < DAYS_IN_WEEK => Ok(DayKey::Weekday(day)),
            _ => Err(ScheduleError::InvalidWeekday(index)),
        }
    }

    /// Backend weekday index of a calendar date (0 = Sunday)
    pub fn weekday_index(date: NaiveDate) -> u8 {
        date.weekday().num_days_from_sunday() as u8
    }

    /// The weekday index this key falls on
    pub fn weekday_of(&self) -> u8 {
        match self {
            DayKey::Weekday(day) => *day,
            DayKey::Date(date) => Self::weekday_index(*date),
        }
    }

    /// The seven keys of a schedule in display order
    pub fn keys_for(mode: ScheduleMode, week_start: NaiveDate) -> Vec<DayKey> {
        match mode {
            ScheduleMode::Weekday => (0..DAYS_IN_WEEK).map(DayKey::Weekday).collect(),
            ScheduleMode::SpecificWeek => (0..i64::from(DAYS_IN_WEEK))
                .map(|offset| DayKey::Date(week_start + Duration::days(offset)))
                .collect(),
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Weekday(day) => write!(f, "{}", day),
            DayKey::Date(date) => write!(f, "{}", date.format(DATE_KEY_FORMAT)),
        }
    }
}

impl FromStr for DayKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<i64>() {
            return DayKey::weekday(index);
        }
        NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT)
            .map(DayKey::Date)
            .map_err(|_| ScheduleError::InvalidDayKey(s.to_string()))
    }
}

impl Serialize for DayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

struct DayKeyVisitor;

impl Visitor<'_> for DayKeyVisitor {
    type Value = DayKey;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a weekday index 0-6 or a YYYY-MM-DD date")
    }

    fn visit_str<E>(self, value: &str) -> Result<DayKey, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> Result<DayKey, E>
    where
        E: de::Error,
    {
        DayKey::weekday(value).map_err(E::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<DayKey, E>
    where
        E: de::Error,
    {
        let index = i64::try_from(value).unwrap_or(i64::MAX);
        DayKey::weekday(index).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DayKeyVisitor)
    }
}

/// Which kind of schedule is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Recurring schedule keyed by weekday
    Weekday,
    /// One-off hours for the dates of a single week
    SpecificWeek,
}
