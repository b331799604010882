//! Slot scoring.
//!
//! Weights and step thresholds are plain data ([`ScoringConfig`]); the
//! [`SlotScorer`] applies them to candidate slots.

mod scorer;
mod weights;

pub use scorer::{round2, score_slot, SlotScorer};
pub use weights::{DayTier, HourBand, RatioTier, ScoringConfig, ScoringThresholds, ScoringWeights};
