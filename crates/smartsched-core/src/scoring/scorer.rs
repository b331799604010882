//! Multi-factor slot scoring.
//!
//! Each candidate slot gets five sub-scores on a 0-5 scale:
//! - Deadline proximity (days from the slot's date to the deadline)
//! - Priority alignment (task priority 1-5, taken as-is)
//! - Time-of-day preference (hour the slot starts)
//! - Buffer adequacy (available minutes / required minutes)
//! - Soonness (days from today to the slot's date)
//!
//! The composite is their weighted sum, rounded to 2 decimals.

use chrono::{NaiveDate, Timelike};

use super::weights::{DayTier, ScoringConfig};
use crate::schedule::{CandidateSlot, CandidateTask, Confidence, Reason, ScoredSlot, SlotScore};

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn tiered(days: i64, tiers: &[DayTier], beyond: f64) -> f64 {
    tiers
        .iter()
        .find(|tier| days <= tier.max_days)
        .map_or(beyond, |tier| tier.score)
}

/// Slot scorer. Pure: the same slot, task and `today` always score the same.
#[derive(Debug, Clone, Default)]
pub struct SlotScorer {
    config: ScoringConfig,
}

impl SlotScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Deadline proximity for a slot on `slot_date`.
    pub fn deadline_score(&self, slot_date: NaiveDate, deadline: Option<NaiveDate>) -> f64 {
        let t = &self.config.thresholds;
        let Some(deadline) = deadline else {
            return t.no_deadline;
        };
        let days = (deadline - slot_date).num_days();
        if days < 0 {
            return t.past_deadline;
        }
        tiered(days, &t.deadline_tiers, t.deadline_beyond)
    }

    pub fn priority_score(&self, priority: u8) -> f64 {
        f64::from(priority.clamp(1, 5))
    }

    /// Preference for the hour the slot starts in.
    pub fn time_of_day_score(&self, start_hour: u32) -> f64 {
        let t = &self.config.thresholds;
        t.hour_bands
            .iter()
            .find(|band| start_hour >= band.from_hour && start_hour < band.to_hour)
            .map_or(t.off_hours, |band| band.score)
    }

    /// Headroom of the slot over the task's duration.
    pub fn buffer_score(&self, available_minutes: i64, required_minutes: i64) -> f64 {
        let t = &self.config.thresholds;
        if required_minutes <= 0 {
            return t.buffer_insufficient;
        }
        let ratio = available_minutes as f64 / required_minutes as f64;
        t.buffer_tiers
            .iter()
            .find(|tier| ratio >= tier.min_ratio)
            .map_or(t.buffer_insufficient, |tier| tier.score)
    }

    /// How soon the slot is relative to `today`.
    pub fn soonness_score(&self, slot_date: NaiveDate, today: NaiveDate) -> f64 {
        let t = &self.config.thresholds;
        let days = (slot_date - today).num_days().max(0);
        tiered(days, &t.soonness_tiers, t.soonness_beyond)
    }

    /// All five sub-scores for a slot.
    pub fn factors(&self, slot: &CandidateSlot, task: &CandidateTask, today: NaiveDate) -> SlotScore {
        SlotScore {
            deadline: self.deadline_score(slot.date, task.deadline),
            priority: self.priority_score(task.priority),
            time_of_day: self.time_of_day_score(slot.start.hour()),
            buffer: self.buffer_score(slot.duration_minutes, task.duration_minutes),
            soonness: self.soonness_score(slot.date, today),
        }
    }

    /// Weighted composite, rounded to 2 decimals.
    pub fn composite(&self, factors: &SlotScore) -> f64 {
        let w = &self.config.weights;
        round2(
            factors.deadline * w.deadline
                + factors.priority * w.priority
                + factors.time_of_day * w.time_of_day
                + factors.buffer * w.buffer
                + factors.soonness * w.soonness,
        )
    }

    pub fn reasons(&self, factors: &SlotScore, task: &CandidateTask) -> Vec<Reason> {
        let t = &self.config.thresholds;
        let mut reasons = Vec::new();
        if factors.deadline > t.deadline_reason_above {
            reasons.push(Reason::DeadlineNear);
        }
        if task.priority >= t.priority_reason_min {
            reasons.push(Reason::HighPriority);
        }
        if factors.time_of_day >= t.time_of_day_reason_min {
            reasons.push(Reason::OptimalTimeWindow);
        }
        if factors.buffer >= t.buffer_reason_min {
            reasons.push(Reason::AmpleBuffer);
        }
        if factors.soonness >= t.soonness_reason_min {
            reasons.push(Reason::StartImmediately);
        }
        reasons
    }

    pub fn confidence(&self, score: f64) -> Confidence {
        let t = &self.config.thresholds;
        if score >= t.high_confidence_min {
            Confidence::High
        } else if score >= t.medium_confidence_min {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Score one candidate slot.
    pub fn score(&self, slot: &CandidateSlot, task: &CandidateTask, today: NaiveDate) -> ScoredSlot {
        let factors = self.factors(slot, task, today);
        let score = self.composite(&factors);
        ScoredSlot {
            slot: slot.clone(),
            score,
            confidence: self.confidence(score),
            reasons: self.reasons(&factors, task),
            factors,
        }
    }

    /// Score every candidate, preserving input order.
    pub fn score_all(
        &self,
        slots: &[CandidateSlot],
        task: &CandidateTask,
        today: NaiveDate,
    ) -> Vec<ScoredSlot> {
        slots.iter().map(|slot| self.score(slot, task, today)).collect()
    }
}

/// Convenience function to score a slot with the default weights
pub fn score_slot(slot: &CandidateSlot, task: &CandidateTask, today: NaiveDate) -> ScoredSlot {
    SlotScorer::new().score(slot, task, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{parse_time, weekday_index};
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn slot(on: &str, start: &str, end: &str) -> CandidateSlot {
        let start = parse_time("start", start).unwrap();
        let end = parse_time("end", end).unwrap();
        CandidateSlot {
            date: date(on),
            weekday: weekday_index(date(on)),
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }

    #[test]
    fn deadline_tiers() {
        let scorer = SlotScorer::new();
        let slot_day = date("2025-11-25");
        assert_eq!(scorer.deadline_score(slot_day, None), 3.0);
        assert_eq!(scorer.deadline_score(slot_day, Some(date("2025-11-24"))), 0.0);
        assert_eq!(scorer.deadline_score(slot_day, Some(date("2025-11-25"))), 5.0);
        assert_eq!(scorer.deadline_score(slot_day, Some(date("2025-11-26"))), 4.5);
        assert_eq!(scorer.deadline_score(slot_day, Some(date("2025-11-28"))), 4.0);
        assert_eq!(scorer.deadline_score(slot_day, Some(date("2025-12-02"))), 3.0);
        assert_eq!(scorer.deadline_score(slot_day, Some(date("2025-12-03"))), 2.0);
    }

    #[test]
    fn time_of_day_bands() {
        let scorer = SlotScorer::new();
        assert_eq!(scorer.time_of_day_score(7), 2.0);
        assert_eq!(scorer.time_of_day_score(8), 4.0);
        assert_eq!(scorer.time_of_day_score(11), 4.0);
        assert_eq!(scorer.time_of_day_score(12), 5.0);
        assert_eq!(scorer.time_of_day_score(16), 5.0);
        assert_eq!(scorer.time_of_day_score(17), 3.0);
        assert_eq!(scorer.time_of_day_score(21), 3.0);
        assert_eq!(scorer.time_of_day_score(22), 2.0);
    }

    #[test]
    fn buffer_ratios() {
        let scorer = SlotScorer::new();
        assert_eq!(scorer.buffer_score(120, 60), 5.0);
        assert_eq!(scorer.buffer_score(90, 60), 4.0);
        assert_eq!(scorer.buffer_score(72, 60), 3.0);
        assert_eq!(scorer.buffer_score(60, 60), 2.0);
        assert_eq!(scorer.buffer_score(59, 60), 0.0);
    }

    #[test]
    fn soonness_tiers() {
        let scorer = SlotScorer::new();
        let today = date("2025-11-25");
        assert_eq!(scorer.soonness_score(today, today), 5.0);
        assert_eq!(scorer.soonness_score(date("2025-11-26"), today), 4.0);
        assert_eq!(scorer.soonness_score(date("2025-11-28"), today), 3.0);
        assert_eq!(scorer.soonness_score(date("2025-12-02"), today), 2.0);
        assert_eq!(scorer.soonness_score(date("2025-12-03"), today), 1.0);
    }

    #[test]
    fn composite_reasons_and_confidence() {
        let task = CandidateTask::new(120, Some(date("2025-11-27")), 5).unwrap();
        let today = date("2025-11-25");

        // 4.0*0.30 + 5.0*0.20 + 4.0*0.20 + 5.0*0.15 + 5.0*0.15
        let morning = score_slot(&slot("2025-11-25", "10:30", "22:00"), &task, today);
        assert_eq!(morning.score, 4.5);
        assert_eq!(morning.confidence, Confidence::High);
        assert_eq!(
            morning.reasons,
            vec![
                Reason::DeadlineNear,
                Reason::HighPriority,
                Reason::OptimalTimeWindow,
                Reason::AmpleBuffer,
                Reason::StartImmediately,
            ]
        );

        // 4.5*0.30 + 5.0*0.20 + 4.0*0.20 + 5.0*0.15 + 4.0*0.15
        let tomorrow = score_slot(&slot("2025-11-26", "08:00", "22:00"), &task, today);
        assert_eq!(tomorrow.score, 4.5);

        let evening_task = CandidateTask::new(60, None, 2).unwrap();
        let evening = score_slot(&slot("2025-11-30", "18:00", "19:00"), &evening_task, today);
        // 3.0*0.30 + 2.0*0.20 + 3.0*0.20 + 2.0*0.15 + 2.0*0.15
        assert_eq!(evening.score, 2.5);
        assert_eq!(evening.confidence, Confidence::Low);
        assert!(evening.reasons.is_empty());
    }

    #[test]
    fn confidence_bands() {
        let scorer = SlotScorer::new();
        assert_eq!(scorer.confidence(4.0), Confidence::High);
        assert_eq!(scorer.confidence(3.99), Confidence::Medium);
        assert_eq!(scorer.confidence(3.0), Confidence::Medium);
        assert_eq!(scorer.confidence(2.99), Confidence::Low);
    }

    #[test]
    fn custom_weights_change_composite() {
        let mut config = ScoringConfig::default();
        config.weights = crate::scoring::ScoringWeights {
            deadline: 0.0,
            priority: 1.0,
            time_of_day: 0.0,
            buffer: 0.0,
            soonness: 0.0,
        };
        let scorer = SlotScorer::with_config(config);
        let task = CandidateTask::new(30, None, 2).unwrap();
        let scored = scorer.score(&slot("2025-11-25", "13:00", "14:00"), &task, date("2025-11-25"));
        assert_eq!(scored.score, 2.0);
    }

    proptest! {
        #[test]
        fn prop_deadline_score_is_monotone(days in 0i64..60) {
            let scorer = SlotScorer::new();
            let slot_day = date("2025-11-25");
            let far = scorer.deadline_score(slot_day, Some(slot_day + chrono::Duration::days(days + 1)));
            let near = scorer.deadline_score(slot_day, Some(slot_day + chrono::Duration::days(days)));
            prop_assert!(near >= far);
        }

        #[test]
        fn prop_scoring_is_deterministic(minutes in 1i64..600, priority in 1i64..=5, offset in 0i64..10) {
            let task = CandidateTask::new(minutes, Some(date("2025-12-01")), priority).unwrap();
            let today = date("2025-11-25");
            let mut s = slot("2025-11-25", "08:00", "22:00");
            s.date = today + chrono::Duration::days(offset);
            let a = score_slot(&s, &task, today);
            let b = score_slot(&s, &task, today);
            prop_assert_eq!(&a, &b);
            prop_assert!((0.0..=5.0).contains(&a.score));
        }
    }
}
