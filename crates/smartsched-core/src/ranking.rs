//! Ranking of scored slots.
//!
//! Order is score descending, then earlier date, then earlier start. The
//! tie-break makes the output reproducible for equal scores.

use std::cmp::Ordering;

use crate::schedule::ScoredSlot;

/// Default number of suggestions returned.
pub const DEFAULT_TOP_K: usize = 3;

/// Total order used for ranking: best first.
pub fn compare_slots(a: &ScoredSlot, b: &ScoredSlot) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.slot.date.cmp(&b.slot.date))
        .then_with(|| a.slot.start.cmp(&b.slot.start))
}

/// Keeps the best `top_k` slots.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    top_k: usize,
}

impl Ranker {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Sort best-first and truncate. An empty input ranks to an empty list.
    pub fn rank(&self, mut slots: Vec<ScoredSlot>) -> Vec<ScoredSlot> {
        slots.sort_by(compare_slots);
        slots.truncate(self.top_k);
        slots
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

/// Convenience function to rank with the default top K
pub fn rank_slots(slots: Vec<ScoredSlot>) -> Vec<ScoredSlot> {
    Ranker::default().rank(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{parse_time, weekday_index, CandidateSlot, Confidence, SlotScore};
    use chrono::NaiveDate;

    fn scored(on: &str, start: &str, score: f64) -> ScoredSlot {
        let date = NaiveDate::parse_from_str(on, "%Y-%m-%d").unwrap();
        let start = parse_time("start", start).unwrap();
        ScoredSlot {
            slot: CandidateSlot {
                date,
                weekday: weekday_index(date),
                start,
                end: parse_time("end", "22:00").unwrap(),
                duration_minutes: (parse_time("end", "22:00").unwrap() - start).num_minutes(),
            },
            score,
            confidence: Confidence::Medium,
            reasons: Vec::new(),
            factors: SlotScore::default(),
        }
    }

    #[test]
    fn sorts_by_score_descending() {
        let ranked = Ranker::new(10).rank(vec![
            scored("2025-11-25", "08:00", 3.1),
            scored("2025-11-25", "12:00", 4.2),
            scored("2025-11-26", "08:00", 3.8),
        ]);
        let scores: Vec<f64> = ranked.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![4.2, 3.8, 3.1]);
    }

    #[test]
    fn ties_break_on_date_then_start() {
        let ranked = Ranker::new(10).rank(vec![
            scored("2025-11-27", "08:00", 4.0),
            scored("2025-11-26", "15:00", 4.0),
            scored("2025-11-26", "09:00", 4.0),
        ]);
        let order: Vec<(String, String)> = ranked
            .iter()
            .map(|s| (s.slot.date.to_string(), s.slot.start.format("%H:%M").to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2025-11-26".to_string(), "09:00".to_string()),
                ("2025-11-26".to_string(), "15:00".to_string()),
                ("2025-11-27".to_string(), "08:00".to_string()),
            ]
        );
    }

    #[test]
    fn truncates_to_top_k() {
        let slots = (0..6)
            .map(|i| scored("2025-11-25", "08:00", f64::from(i)))
            .collect();
        let ranked = rank_slots(slots);
        assert_eq!(ranked.len(), DEFAULT_TOP_K);
        assert_eq!(ranked[0].score, 5.0);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(rank_slots(Vec::new()).is_empty());
    }
}
