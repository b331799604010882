//! Candidate slot filtering.

use chrono::NaiveDate;

use crate::schedule::{weekday_index, CandidateSlot, TimeInterval};

/// Keep the gaps of one date that can hold `required_minutes`.
pub fn filter_candidates(
    date: NaiveDate,
    gaps: &[TimeInterval],
    required_minutes: i64,
) -> Vec<CandidateSlot> {
    let weekday = weekday_index(date);
    gaps.iter()
        .filter(|gap| gap.duration_minutes() >= required_minutes)
        .map(|gap| CandidateSlot {
            date,
            weekday,
            start: gap.start(),
            end: gap.end(),
            duration_minutes: gap.duration_minutes(),
        })
        .collect()
}
