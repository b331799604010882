//! Schedule types: commitments, scheduled tasks, the task being placed,
//! and the slots derived for it.
//!
//! Times of day are `chrono::NaiveTime` at minute resolution and travel
//! over serde as `"HH:MM"`. Weekdays are numbered 0=Sun ... 6=Sat.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Parse a time of day (`HH:MM` or `HH:MM:SS`), truncating to the minute.
///
/// # Errors
/// Returns [`ValidationError::MalformedTime`] if `value` is not a valid time.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map(truncate_to_minute)
        .map_err(|_| ValidationError::MalformedTime {
            field: field.to_string(),
            value: value.to_string(),
        })
}

pub(crate) fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

/// Whole minutes from `start` to `end`.
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes()
}

/// Weekday index of a date, 0=Sun ... 6=Sat.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Serde adapter for `NaiveTime` as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time("time", &raw).map_err(serde::de::Error::custom)
    }
}

/// A half-open span within a single day. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
}

#[derive(Deserialize)]
struct RawInterval {
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Create a new interval.
    ///
    /// # Errors
    /// Returns an error if `end <= start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        Self::checked("interval", start, end)
    }

    pub(crate) fn checked(
        field: &str,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, ValidationError> {
        let (start, end) = (truncate_to_minute(start), truncate_to_minute(end));
        if end <= start {
            return Err(ValidationError::InvalidTimeRange {
                field: field.to_string(),
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from `HH:MM` strings.
    ///
    /// # Errors
    /// Returns an error for malformed times or an empty/inverted range.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_time("start", start)?, parse_time("end", end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// The default awake window, 08:00-22:00.
pub fn default_awake_window() -> TimeInterval {
    TimeInterval {
        start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
    }
}

/// Where a busy period came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusySource {
    Timetable,
    Task,
}

/// An occupied interval on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub source: BusySource,
    pub label: String,
}

impl BusyPeriod {
    pub fn start(&self) -> NaiveTime {
        self.interval.start()
    }

    pub fn end(&self) -> NaiveTime {
        self.interval.end()
    }
}

/// A weekly timetable entry, e.g. a class every Tuesday 09:00-10:30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringCommitment {
    /// 0=Sun ... 6=Sat
    pub weekday: u8,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub label: String,
}

impl RecurringCommitment {
    /// Validate the entry and return its interval.
    ///
    /// # Errors
    /// Returns an error if the weekday is outside 0..=6 or the range is empty.
    pub fn interval(&self) -> Result<TimeInterval, ValidationError> {
        if self.weekday > 6 {
            return Err(ValidationError::invalid(
                "recurring_commitments.weekday",
                format!("{} is outside 0..=6", self.weekday),
            ));
        }
        TimeInterval::checked("recurring_commitments", self.start, self.end)
    }
}

/// A task already placed on the calendar by the user.
///
/// `date` is optional; see [`crate::timeline::CalendarAggregator`] for how
/// undated entries are projected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl ScheduledTask {
    /// Busy interval for this task; an end past midnight is clamped to 23:59.
    ///
    /// Returns `None` when the task occupies no time: a non-positive
    /// duration, or a start at 23:59 that clamps to an empty span.
    pub fn interval(&self, default_minutes: i64) -> Option<TimeInterval> {
        let minutes = self.duration_minutes.unwrap_or(default_minutes);
        if minutes <= 0 {
            return None;
        }
        let start = truncate_to_minute(self.start);
        let last_minute = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
        let end = if minutes >= minutes_between(start, last_minute) {
            last_minute
        } else {
            start + chrono::Duration::minutes(minutes)
        };
        TimeInterval::checked("scheduled_tasks", start, end).ok()
    }
}

/// The task being placed, after defaults and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTask {
    pub duration_minutes: i64,
    pub deadline: Option<NaiveDate>,
    /// 1 (lowest) ..= 5 (highest)
    pub priority: u8,
}

impl CandidateTask {
    /// # Errors
    /// Returns an error if the duration is not positive or priority is outside 1..=5.
    pub fn new(
        duration_minutes: i64,
        deadline: Option<NaiveDate>,
        priority: i64,
    ) -> Result<Self, ValidationError> {
        if duration_minutes <= 0 {
            return Err(ValidationError::invalid(
                "task.duration_minutes",
                format!("must be positive, got {duration_minutes}"),
            ));
        }
        if !(1..=5).contains(&priority) {
            return Err(ValidationError::invalid(
                "task.priority",
                format!("{priority} is outside 1..=5"),
            ));
        }
        Ok(Self {
            duration_minutes,
            deadline,
            priority: priority as u8,
        })
    }
}

/// A free interval long enough for the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    /// 0=Sun ... 6=Sat
    pub weekday: u8,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Available minutes in the gap, not the task's duration.
    pub duration_minutes: i64,
}

/// Display bucket for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Justification tag attached to a scored slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "deadline is near")]
    DeadlineNear,
    #[serde(rename = "high priority")]
    HighPriority,
    #[serde(rename = "optimal time window")]
    OptimalTimeWindow,
    #[serde(rename = "ample buffer")]
    AmpleBuffer,
    #[serde(rename = "can start immediately")]
    StartImmediately,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeadlineNear => "deadline is near",
            Self::HighPriority => "high priority",
            Self::OptimalTimeWindow => "optimal time window",
            Self::AmpleBuffer => "ample buffer",
            Self::StartImmediately => "can start immediately",
        }
    }
}

/// Per-factor sub-scores, each 0.0-5.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SlotScore {
    pub deadline: f64,
    pub priority: f64,
    pub time_of_day: f64,
    pub buffer: f64,
    pub soonness: f64,
}

/// A candidate slot with its composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSlot {
    #[serde(flatten)]
    pub slot: CandidateSlot,
    /// Weighted composite, rounded to 2 decimals.
    pub score: f64,
    pub confidence: Confidence,
    pub reasons: Vec<Reason>,
    /// Sub-score breakdown; kept in memory only, not part of the output.
    #[serde(default, skip_serializing)]
    pub factors: SlotScore,
}
