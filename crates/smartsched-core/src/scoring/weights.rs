//! Tunable weights and thresholds for slot scoring.
//!
//! Every constant the scorer uses lives here so it can be overridden from
//! `config.toml` and tested in isolation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Per-factor weights. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight for deadline proximity (default 0.30)
    pub deadline: f64,
    /// Weight for task priority (default 0.20)
    pub priority: f64,
    /// Weight for time-of-day preference (default 0.20)
    pub time_of_day: f64,
    /// Weight for buffer adequacy (default 0.15)
    pub buffer: f64,
    /// Weight for soonness (default 0.15)
    pub soonness: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            deadline: 0.30,
            priority: 0.20,
            time_of_day: 0.20,
            buffer: 0.15,
            soonness: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.deadline + self.priority + self.time_of_day + self.buffer + self.soonness
    }

    /// # Errors
    /// Returns an error for a negative weight or a sum other than 1.0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("deadline", self.deadline),
            ("priority", self.priority),
            ("time_of_day", self.time_of_day),
            ("buffer", self.buffer),
            ("soonness", self.soonness),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(ValidationError::invalid(
                    format!("scoring.weights.{name}"),
                    format!("must be a non-negative number, got {w}"),
                ));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ValidationError::invalid(
                "scoring.weights",
                format!("weights must sum to 1.0, got {sum}"),
            ));
        }
        Ok(())
    }
}

/// Score for "at most `max_days` away". Tiers are checked in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTier {
    pub max_days: i64,
    pub score: f64,
}

/// Score for a slot starting in `[from_hour, to_hour)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBand {
    pub from_hour: u32,
    pub to_hour: u32,
    pub score: f64,
}

/// Score for an available/required ratio of at least `min_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioTier {
    pub min_ratio: f64,
    pub score: f64,
}

fn day_tier(max_days: i64, score: f64) -> DayTier {
    DayTier { max_days, score }
}

/// Step tables and tag/confidence cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringThresholds {
    pub no_deadline: f64,
    pub past_deadline: f64,
    /// Days from slot date to deadline
    pub deadline_tiers: Vec<DayTier>,
    pub deadline_beyond: f64,

    pub hour_bands: Vec<HourBand>,
    pub off_hours: f64,

    pub buffer_tiers: Vec<RatioTier>,
    pub buffer_insufficient: f64,

    /// Days from today to slot date
    pub soonness_tiers: Vec<DayTier>,
    pub soonness_beyond: f64,

    /// Tag "deadline is near" when the deadline sub-score is strictly above this.
    pub deadline_reason_above: f64,
    pub priority_reason_min: u8,
    pub time_of_day_reason_min: f64,
    pub buffer_reason_min: f64,
    pub soonness_reason_min: f64,

    pub high_confidence_min: f64,
    pub medium_confidence_min: f64,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            no_deadline: 3.0,
            past_deadline: 0.0,
            deadline_tiers: vec![
                day_tier(0, 5.0),
                day_tier(1, 4.5),
                day_tier(3, 4.0),
                day_tier(7, 3.0),
            ],
            deadline_beyond: 2.0,
            hour_bands: vec![
                HourBand { from_hour: 8, to_hour: 12, score: 4.0 },
                HourBand { from_hour: 12, to_hour: 17, score: 5.0 },
                HourBand { from_hour: 17, to_hour: 22, score: 3.0 },
            ],
            off_hours: 2.0,
            buffer_tiers: vec![
                RatioTier { min_ratio: 2.0, score: 5.0 },
                RatioTier { min_ratio: 1.5, score: 4.0 },
                RatioTier { min_ratio: 1.2, score: 3.0 },
                RatioTier { min_ratio: 1.0, score: 2.0 },
            ],
            buffer_insufficient: 0.0,
            soonness_tiers: vec![
                day_tier(0, 5.0),
                day_tier(1, 4.0),
                day_tier(3, 3.0),
                day_tier(7, 2.0),
            ],
            soonness_beyond: 1.0,
            deadline_reason_above: 3.0,
            priority_reason_min: 4,
            time_of_day_reason_min: 4.0,
            buffer_reason_min: 4.0,
            soonness_reason_min: 4.0,
            high_confidence_min: 4.0,
            medium_confidence_min: 3.0,
        }
    }
}

impl ScoringThresholds {
    /// # Errors
    /// Returns an error for sub-scores outside 0.0-5.0 or unordered tiers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let in_range = |field: &str, v: f64| {
            if (0.0..=5.0).contains(&v) {
                Ok(())
            } else {
                Err(ValidationError::invalid(
                    format!("scoring.thresholds.{field}"),
                    format!("sub-score {v} is outside 0.0-5.0"),
                ))
            }
        };

        in_range("no_deadline", self.no_deadline)?;
        in_range("past_deadline", self.past_deadline)?;
        in_range("deadline_beyond", self.deadline_beyond)?;
        in_range("off_hours", self.off_hours)?;
        in_range("buffer_insufficient", self.buffer_insufficient)?;
        in_range("soonness_beyond", self.soonness_beyond)?;

        for tier in self.deadline_tiers.iter().chain(&self.soonness_tiers) {
            in_range("tiers", tier.score)?;
        }
        for band in &self.hour_bands {
            in_range("hour_bands", band.score)?;
            if band.from_hour >= band.to_hour || band.to_hour > 24 {
                return Err(ValidationError::invalid(
                    "scoring.thresholds.hour_bands",
                    format!("empty band {}..{}", band.from_hour, band.to_hour),
                ));
            }
        }
        for tier in &self.buffer_tiers {
            in_range("buffer_tiers", tier.score)?;
        }

        let ascending = |tiers: &[DayTier]| tiers.windows(2).all(|w| w[0].max_days < w[1].max_days);
        if !ascending(self.deadline_tiers.as_slice()) || !ascending(self.soonness_tiers.as_slice()) {
            return Err(ValidationError::invalid(
                "scoring.thresholds",
                "day tiers must be listed in ascending max_days order",
            ));
        }
        if !self
            .buffer_tiers
            .windows(2)
            .all(|w| w[0].min_ratio > w[1].min_ratio)
        {
            return Err(ValidationError::invalid(
                "scoring.thresholds.buffer_tiers",
                "buffer tiers must be listed in descending min_ratio order",
            ));
        }
        Ok(())
    }
}

/// Weights plus thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub thresholds: ScoringThresholds,
}

impl ScoringConfig {
    /// # Errors
    /// Returns the first invalid weight or threshold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.weights.validate()?;
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let weights = ScoringWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-9);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn unbalanced_weights_are_rejected() {
        let weights = ScoringWeights {
            deadline: 0.5,
            ..Default::default()
        };
        assert!(weights.validate().is_err());

        let negative = ScoringWeights {
            deadline: -0.1,
            priority: 0.6,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn default_thresholds_are_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn unordered_tiers_are_rejected() {
        let mut thresholds = ScoringThresholds::default();
        thresholds.deadline_tiers.swap(0, 2);
        assert!(thresholds.validate().is_err());

        let mut thresholds = ScoringThresholds::default();
        thresholds.buffer_tiers.reverse();
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn out_of_range_sub_score_is_rejected() {
        let thresholds = ScoringThresholds {
            off_hours: 7.5,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }
}
