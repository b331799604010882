//! Busy-period aggregation across the lookahead horizon.
//!
//! Merges weekly timetable entries and already scheduled tasks into one
//! sorted list of busy periods per calendar date.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::error::ValidationError;
use crate::schedule::{
    weekday_index, BusyPeriod, BusySource, RecurringCommitment, ScheduledTask,
};

/// Per-date busy periods, ordered by date.
pub type BusyCalendar = BTreeMap<NaiveDate, Vec<BusyPeriod>>;

/// Builds busy periods from a read-only snapshot of commitments.
#[derive(Debug, Clone)]
pub struct CalendarAggregator<'a> {
    commitments: &'a [RecurringCommitment],
    scheduled: &'a [ScheduledTask],
    undated_tasks_today_only: bool,
    default_task_minutes: i64,
}

impl<'a> CalendarAggregator<'a> {
    pub fn new(commitments: &'a [RecurringCommitment], scheduled: &'a [ScheduledTask]) -> Self {
        Self {
            commitments,
            scheduled,
            undated_tasks_today_only: true,
            default_task_minutes: 60,
        }
    }

    /// Where undated scheduled tasks land: only on `today` (the default),
    /// or on every date of the horizon when `false`.
    pub fn with_undated_tasks_today_only(mut self, today_only: bool) -> Self {
        self.undated_tasks_today_only = today_only;
        self
    }

    /// Duration assumed for scheduled tasks that carry none.
    pub fn with_default_task_minutes(mut self, minutes: i64) -> Self {
        self.default_task_minutes = minutes;
        self
    }

    fn task_applies(&self, task: &ScheduledTask, date: NaiveDate, today: NaiveDate) -> bool {
        match task.date {
            Some(scheduled_on) => scheduled_on == date,
            None if self.undated_tasks_today_only => date == today,
            None => true,
        }
    }

    /// Busy periods for a single date, sorted by start time.
    ///
    /// Scheduled tasks that occupy no time add no busy period.
    ///
    /// # Errors
    /// Returns an error if any recurring commitment is malformed.
    pub fn busy_periods(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<BusyPeriod>, ValidationError> {
        let weekday = weekday_index(date);
        let mut periods = Vec::new();

        for class in self.commitments {
            let interval = class.interval()?;
            if class.weekday == weekday {
                periods.push(BusyPeriod {
                    interval,
                    source: BusySource::Timetable,
                    label: class.label.clone(),
                });
            }
        }

        for task in self.scheduled {
            if !self.task_applies(task, date, today) {
                continue;
            }
            let Some(interval) = task.interval(self.default_task_minutes) else {
                tracing::debug!(
                    %date,
                    label = %task.label,
                    start = %task.start.format("%H:%M"),
                    duration_minutes = ?task.duration_minutes,
                    "scheduled task occupies no time, skipping"
                );
                continue;
            };
            if task.date.is_none() {
                tracing::debug!(
                    %date,
                    label = %task.label,
                    today_only = self.undated_tasks_today_only,
                    "projecting undated scheduled task"
                );
            }
            periods.push(BusyPeriod {
                interval,
                source: BusySource::Task,
                label: task.label.clone(),
            });
        }

        periods.sort_by_key(|p| (p.start(), p.end()));
        Ok(periods)
    }

    /// Busy periods for every date in `[today, today + horizon_days)`.
    ///
    /// Dates with no busy periods are present with an empty list.
    ///
    /// # Errors
    /// Returns an error if any recurring commitment is malformed.
    pub fn aggregate(
        &self,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<BusyCalendar, ValidationError> {
        let mut calendar = BTreeMap::new();
        for offset in 0..u64::from(horizon_days) {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            calendar.insert(date, self.busy_periods(date, today)?);
        }
        Ok(calendar)
    }
}
