//! Recommendation pipeline.
//!
//! `(task, horizon)` -> busy calendar -> gaps -> candidate slots -> scores
//! -> ranked top K. Pure over the snapshot in the request; "today" is always
//! passed in by the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::ranking::Ranker;
use crate::schedule::{
    CandidateSlot, CandidateTask, RecurringCommitment, ScheduledTask, ScoredSlot, TimeInterval,
};
use crate::scoring::SlotScorer;
use crate::storage::{EngineConfig, MAX_HORIZON_DAYS};
use crate::timeline::{filter_candidates, BusyCalendar, CalendarAggregator, GapFinder};

/// The task as supplied by the caller. Missing fields fall back to
/// [`crate::storage::DefaultsConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<i64>,
}

/// One recommendation request: the task plus a snapshot of the user's week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub task: TaskInput,
    #[serde(default)]
    pub horizon_days: Option<u32>,
    #[serde(default)]
    pub recurring_commitments: Vec<RecurringCommitment>,
    #[serde(default)]
    pub scheduled_tasks: Vec<ScheduledTask>,
    #[serde(default)]
    pub awake_window: Option<TimeInterval>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl SuggestRequest {
    pub fn new(task: TaskInput) -> Self {
        Self {
            task,
            ..Default::default()
        }
    }
}

/// A request with every default applied and every field validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub task: CandidateTask,
    pub horizon_days: u32,
    pub awake_window: TimeInterval,
    pub top_k: usize,
}

/// Stateless recommendation engine.
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    config: EngineConfig,
}

impl SuggestionEngine {
    /// Create an engine with the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    ///
    /// # Errors
    /// Returns an error if the config does not validate.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply defaults and validate the request-level fields.
    ///
    /// # Errors
    /// Returns [`ValidationError`] for a bad duration, priority, horizon, top K
    /// or awake window.
    pub fn resolve(&self, request: &SuggestRequest) -> Result<ResolvedRequest, ValidationError> {
        let defaults = &self.config.defaults;
        let task = CandidateTask::new(
            request.task.duration_minutes.unwrap_or(defaults.task_minutes),
            request.task.deadline,
            request.task.priority.unwrap_or(defaults.task_priority),
        )?;

        let horizon_days = request.horizon_days.unwrap_or(defaults.horizon_days);
        if horizon_days > MAX_HORIZON_DAYS {
            return Err(ValidationError::invalid(
                "horizon_days",
                format!("{horizon_days} exceeds the maximum of {MAX_HORIZON_DAYS}"),
            ));
        }

        let top_k = request.top_k.unwrap_or(defaults.top_k);
        if top_k == 0 {
            return Err(ValidationError::invalid("top_k", "must be at least 1"));
        }

        let awake_window = match request.awake_window {
            Some(window) => window,
            None => defaults.awake_window()?,
        };

        Ok(ResolvedRequest {
            task,
            horizon_days,
            awake_window,
            top_k,
        })
    }

    /// Busy periods for every date of the horizon.
    ///
    /// # Errors
    /// Returns an error if a commitment or scheduled task is malformed.
    pub fn aggregate(
        &self,
        request: &SuggestRequest,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<BusyCalendar, ValidationError> {
        CalendarAggregator::new(&request.recurring_commitments, &request.scheduled_tasks)
            .with_undated_tasks_today_only(self.config.undated_tasks_today_only)
            .with_default_task_minutes(self.config.defaults.task_minutes)
            .aggregate(today, horizon_days)
    }

    /// Free slots across the calendar that can hold `required_minutes`,
    /// in date then start order.
    pub fn candidates(
        &self,
        calendar: &BusyCalendar,
        awake_window: TimeInterval,
        required_minutes: i64,
    ) -> Vec<CandidateSlot> {
        let finder = GapFinder::new(awake_window);
        calendar
            .iter()
            .flat_map(|(date, busy)| {
                let gaps = finder.find_gaps(busy);
                filter_candidates(*date, &gaps, required_minutes)
            })
            .collect()
    }

    pub fn score_all(
        &self,
        slots: &[CandidateSlot],
        task: &CandidateTask,
        today: NaiveDate,
    ) -> Vec<ScoredSlot> {
        SlotScorer::with_config(self.config.scoring.clone()).score_all(slots, task, today)
    }

    pub fn rank(&self, scored: Vec<ScoredSlot>, top_k: usize) -> Vec<ScoredSlot> {
        Ranker::new(top_k).rank(scored)
    }

    /// Ranked suggestions for the request, best first.
    ///
    /// An empty list means no slot in the horizon fits the task; it is not
    /// an error.
    ///
    /// # Errors
    /// Returns a validation error before any computation if the input is invalid.
    pub fn suggest(&self, request: &SuggestRequest, today: NaiveDate) -> Result<Vec<ScoredSlot>> {
        let resolved = self.resolve(request)?;
        tracing::info!(
            %today,
            duration_minutes = resolved.task.duration_minutes,
            deadline = ?resolved.task.deadline,
            priority = resolved.task.priority,
            horizon_days = resolved.horizon_days,
            "starting schedule suggestion"
        );

        let calendar = self.aggregate(request, today, resolved.horizon_days)?;
        tracing::debug!(
            timetable_entries = request.recurring_commitments.len(),
            scheduled_tasks = request.scheduled_tasks.len(),
            busy_periods = calendar.values().map(Vec::len).sum::<usize>(),
            "loaded busy periods"
        );

        let slots = self.candidates(&calendar, resolved.awake_window, resolved.task.duration_minutes);
        tracing::debug!(free_slots = slots.len(), "found free slots");
        if slots.is_empty() {
            return Ok(Vec::new());
        }

        let scored = self.score_all(&slots, &resolved.task, today);
        let ranked = self.rank(scored, resolved.top_k);
        tracing::info!(
            suggestions = ranked.len(),
            top_scores = ?ranked.iter().map(|s| s.score).collect::<Vec<_>>(),
            "returning top suggestions"
        );
        Ok(ranked)
    }
}

/// Ranked suggestions using `config`.
///
/// # Errors
/// Returns an error if the config or the request is invalid.
pub fn suggest(
    request: &SuggestRequest,
    today: NaiveDate,
    config: &EngineConfig,
) -> Result<Vec<ScoredSlot>> {
    SuggestionEngine::with_config(config.clone())?.suggest(request, today)
}
