use super::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One span of work hours within a day
///
/// Hours are 0-23 and minutes 0-59; both are checked on construction. The
/// interval does not require `from` to be earlier than `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    from_hour: u8,
    from_minutes: u8,
    to_hour: u8,
    to_minutes: u8,
}

#[derive(Deserialize)]
struct RawInterval {
    from_hour: u32,
    from_minutes: u32,
    to_hour: u32,
    to_minutes: u32,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = ScheduleError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        TimeInterval::new(raw.from_hour, raw.from_minutes, raw.to_hour, raw.to_minutes)
    }
}

impl Default for TimeInterval {
    /// 08:00 - 17:00
    fn default() -> Self {
        Self {
            from_hour: 8,
            from_minutes: 0,
            to_hour: 17,
            to_minutes: 0,
        }
    }
}

/// Check a time of day and narrow it to bytes
fn checked_time(hour: u32, minutes: u32) -> Result<(u8, u8), ScheduleError> {
    if hour > 23 || minutes > 59 {
        return Err(ScheduleError::InvalidTime { hour, minutes });
    }
    Ok((hour as u8, minutes as u8))
}

impl TimeInterval {
    pub fn new(
        from_hour: u32,
        from_minutes: u32,
        to_hour: u32,
        to_minutes: u32,
    ) -> Result<Self, ScheduleError> {
        let (from_hour, from_minutes) = checked_time(from_hour, from_minutes)?;
        let (to_hour, to_minutes) = checked_time(to_hour, to_minutes)?;
        Ok(Self {
            from_hour,
            from_minutes,
            to_hour,
            to_minutes,
        })
    }

    pub fn from_hour(&self) -> u8 {
        self.from_hour
    }

    pub fn from_minutes(&self) -> u8 {
        self.from_minutes
    }

    pub fn to_hour(&self) -> u8 {
        self.to_hour
    }

    pub fn to_minutes(&self) -> u8 {
        self.to_minutes
    }

    /// Hour and minutes of one edge
    pub fn bound(&self, edge: Edge) -> (u8, u8) {
        match edge {
            Edge::From => (self.from_hour, self.from_minutes),
            Edge::To => (self.to_hour, self.to_minutes),
        }
    }

    /// Return a copy with one edge replaced; the other edge is kept as is
    pub fn with_bound(&self, edge: Edge, hour: u32, minutes: u32) -> Result<Self, ScheduleError> {
        let (hour, minutes) = checked_time(hour, minutes)?;
        let mut interval = *self;
        match edge {
            Edge::From => {
                interval.from_hour = hour;
                interval.from_minutes = minutes;
            }
            Edge::To => {
                interval.to_hour = hour;
                interval.to_minutes = minutes;
            }
        }
        Ok(interval)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} - {:02}:{:02}",
            self.from_hour, self.from_minutes, self.to_hour, self.to_minutes
        )
    }
}

/// Which end of an interval is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    From,
    To,
}

impl FromStr for Edge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "from" => Ok(Edge::From),
            "to" => Ok(Edge::To),
            _ => Err(format!("Invalid edge '{}'. Valid options are: from, to", s)),
        }
    }
}

/// Parse a clock time written as `H:MM` or `HH:MM`
pub fn parse_clock(s: &str) -> Result<(u32, u32), ScheduleError> {
    let invalid = || ScheduleError::InvalidClock(s.to_string());
    let (hour, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
    if minutes.len() != 2 || hour.is_empty() || hour.len() > 2 {
        return Err(invalid());
    }
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    checked_time(hour, minutes)?;
    Ok((hour, minutes))
}
