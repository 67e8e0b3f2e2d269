//! Recurring schedule rules and the dated session records expanded from them.
//!
//! These are the in-memory inputs and outputs of the session materializer. A
//! [`ScheduleRule`] is a weekly template (weekday + time window + session type);
//! a [`SessionRecord`] is one concrete occurrence on a calendar date.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Wall-clock time
// ============================================================================

/// Time of day without date or timezone.
///
/// Accepts `HH:MM` and `HH:MM:SS` (fractional seconds allowed, as returned by
/// Postgres `time` columns). Displays as `HH:MM` when the seconds are zero so
/// that a value read from `"18:00"` is written back as `"18:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallClockTime(NaiveTime);

/// Error returned when a wall-clock time string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid wall-clock time '{0}', expected HH:MM or HH:MM:SS")]
pub struct InvalidWallClockTime(pub String);

impl WallClockTime {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Build from hour/minute, `None` when out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for WallClockTime {
    type Err = InvalidWallClockTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map(Self)
            .map_err(|_| InvalidWallClockTime(s.to_string()))
    }
}

impl fmt::Display for WallClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.second() == 0 && self.0.nanosecond() == 0 {
            write!(f, "{}", self.0.format("%H:%M"))
        } else {
            write!(f, "{}", self.0.format("%H:%M:%S"))
        }
    }
}

impl Serialize for WallClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Date range
// ============================================================================

/// Inclusive calendar date range.
///
/// A range whose start is after its end is valid and simply contains no days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Error returned when a date range bound is not an ISO calendar date.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DateRangeError {
    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Parse both bounds from `YYYY-MM-DD` strings.
    pub fn parse(start_date: &str, end_date: &str) -> Result<Self, DateRangeError> {
        Ok(Self {
            start_date: parse_iso_date("start_date", start_date)?,
            end_date: parse_iso_date("end_date", end_date)?,
        })
    }

    /// Range covering `days` consecutive days starting at `start_date`.
    ///
    /// `days == 0` yields an empty range. The end is clamped to the last
    /// representable date.
    pub fn starting_at(start_date: NaiveDate, days: u32) -> Self {
        match days.checked_sub(1) {
            Some(extra) => Self::new(
                start_date,
                start_date
                    .checked_add_days(chrono::Days::new(u64::from(extra)))
                    .unwrap_or(NaiveDate::MAX),
            ),
            None => Self::new(start_date, start_date.pred_opt().unwrap_or(NaiveDate::MIN)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date > self.end_date
    }

    /// Number of calendar days in the range (0 when empty).
    pub fn num_days(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end_date - self.start_date).num_days() as usize + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }
}

fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|source| {
        DateRangeError::InvalidDate {
            field,
            value: value.to_string(),
            source,
        }
    })
}

/// Weekday index with Sunday = 0 through Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

// ============================================================================
// Rules and records
// ============================================================================

/// Weekly recurring schedule template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRule {
    /// 0 = Sunday .. 6 = Saturday. Other values never match a date.
    pub day_of_week: i32,
    pub start_time: WallClockTime,
    pub end_time: WallClockTime,
    pub session_type: String,
}

impl ScheduleRule {
    /// Whether this rule applies to a date with the given weekday index.
    pub fn matches(&self, weekday: u32) -> bool {
        u32::try_from(self.day_of_week).is_ok_and(|day| day == weekday)
    }
}

/// Lifecycle status of a training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    Missed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Missed => "missed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "missed" => Ok(Self::Missed),
            other => Err(format!("Unknown session status: {}", other)),
        }
    }
}

/// One dated session expanded from a schedule rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub scheduled_date: NaiveDate,
    pub start_time: WallClockTime,
    pub end_time: WallClockTime,
    pub session_type: String,
    pub status: SessionStatus,
}

impl SessionRecord {
    /// Scheduled occurrence of `rule` on `date`.
    pub fn from_rule(date: NaiveDate, rule: &ScheduleRule) -> Self {
        Self {
            scheduled_date: date,
            start_time: rule.start_time,
            end_time: rule.end_time,
            session_type: rule.session_type.clone(),
            status: SessionStatus::Scheduled,
        }
    }
}
