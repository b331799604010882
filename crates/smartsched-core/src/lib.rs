//! # smartsched Core Library
//!
//! This library recommends time windows for a task. Given the task's
//! duration, optional deadline and priority, plus a snapshot of the user's
//! weekly timetable and already scheduled tasks, it returns a ranked list of
//! candidate slots with a score, a confidence band and reason tags.
//!
//! ## Architecture
//!
//! - **Timeline**: busy-period aggregation, gap detection and candidate
//!   filtering across a rolling horizon
//! - **Scoring**: five weighted 0-5 factors with tunable thresholds
//! - **Ranking**: score descending with a date/start tie-break
//! - **Storage**: TOML-based engine configuration
//!
//! ## Key Components
//!
//! - [`SuggestionEngine`]: the pipeline, also exposed as [`suggest`]
//! - [`SlotScorer`]: per-slot scoring
//! - [`EngineConfig`]: defaults, weights and thresholds

pub mod engine;
pub mod error;
pub mod ranking;
pub mod schedule;
pub mod scoring;
pub mod storage;
pub mod timeline;

pub use engine::{suggest, ResolvedRequest, SuggestRequest, SuggestionEngine, TaskInput};
pub use error::{ConfigError, CoreError, ValidationError};
pub use ranking::{Ranker, DEFAULT_TOP_K};
pub use schedule::{
    BusyPeriod, BusySource, CandidateSlot, CandidateTask, Confidence, Reason,
    RecurringCommitment, ScheduledTask, ScoredSlot, SlotScore, TimeInterval,
};
pub use scoring::{ScoringConfig, ScoringThresholds, ScoringWeights, SlotScorer};
pub use storage::{DefaultsConfig, EngineConfig};
pub use timeline::{CalendarAggregator, GapFinder};
