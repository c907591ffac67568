//! Schedule matching for time-triggered workflows.
//!
//! A workflow fires when the poll lands within [`MATCH_WINDOW_MINUTES`] after
//! its configured time of day (minute of the hour for hourly schedules) and
//! at least one full cadence period has passed since it last fired.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Width of the window after the target time in which a poll fires the workflow.
pub const MATCH_WINDOW_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Hourly,
    Daily,
    Weekly,
}

impl Cadence {
    /// Minimum time between two firings.
    pub fn min_interval(self) -> Duration {
        match self {
            Self::Hourly => Duration::hours(1),
            Self::Daily => Duration::hours(24),
            Self::Weekly => Duration::hours(168),
        }
    }

    /// How far apart consecutive target times are.
    fn target_period(self) -> Duration {
        match self {
            Self::Hourly => Duration::hours(1),
            Self::Daily | Self::Weekly => Duration::days(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("unknown schedule: {0}")]
    UnknownCadence(String),
    #[error("invalid time: {0}")]
    InvalidTime(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub cadence: Cadence,
    /// Time of day in UTC. Only the minute is used for hourly schedules.
    pub at: NaiveTime,
}

impl Schedule {
    /// Parse `schedule` (`hourly` | `daily` | `weekly`) and `time` (`HH:MM` or `HH:MM:SS`).
    pub fn parse(cadence: &str, time: &str) -> Result<Self, ScheduleError> {
        let cadence = match cadence {
            "hourly" => Cadence::Hourly,
            "daily" => Cadence::Daily,
            "weekly" => Cadence::Weekly,
            other => return Err(ScheduleError::UnknownCadence(other.to_owned())),
        };
        let at = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| ScheduleError::InvalidTime(time.to_owned()))?;
        Ok(Self { cadence, at })
    }

    /// The most recent target at or before the current period boundary.
    fn target_for(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let date = now.date_naive();
        let naive = match self.cadence {
            Cadence::Hourly => date.and_hms_opt(now.hour(), self.at.minute(), 0)?,
            Cadence::Daily | Cadence::Weekly => date.and_time(self.at),
        };
        Some(naive.and_utc())
    }

    /// Whether `now` falls in `[target, target + window)` for this or the
    /// previous period (the latter covers windows crossing midnight or the hour).
    pub fn in_window(&self, now: DateTime<Utc>) -> bool {
        let Some(target) = self.target_for(now) else {
            return false;
        };
        let window = Duration::minutes(MATCH_WINDOW_MINUTES);
        [target, target - self.cadence.target_period()]
            .into_iter()
            .any(|t| now >= t && now - t < window)
    }

    /// Whether enough time has passed since the last firing.
    pub fn has_elapsed(&self, now: DateTime<Utc>, last_triggered: Option<DateTime<Utc>>) -> bool {
        last_triggered.is_none_or(|last| now - last >= self.cadence.min_interval())
    }

    pub fn is_due(&self, now: DateTime<Utc>, last_triggered: Option<DateTime<Utc>>) -> bool {
        self.in_window(now) && self.has_elapsed(now, last_triggered)
    }
}
