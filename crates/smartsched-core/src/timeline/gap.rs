//! Free-time detection within the awake window.
//!
//! Subtracts a day's busy periods from the awake window. Busy periods may
//! overlap, nest, or extend past either edge of the window.

use chrono::NaiveTime;

use crate::schedule::{default_awake_window, BusyPeriod, TimeInterval};

/// Detector for finding free gaps in one day
#[derive(Debug, Clone, Copy)]
pub struct GapFinder {
    awake: TimeInterval,
}

impl GapFinder {
    /// Create a finder for the given awake window
    pub fn new(awake: TimeInterval) -> Self {
        Self { awake }
    }

    pub fn awake_window(&self) -> TimeInterval {
        self.awake
    }

    /// Find gaps between busy periods.
    ///
    /// Returns maximal free intervals sorted by start time. A day with no
    /// busy periods yields the whole awake window; a fully covered day
    /// yields nothing.
    pub fn find_gaps(&self, busy: &[BusyPeriod]) -> Vec<TimeInterval> {
        let mut sorted: Vec<(NaiveTime, NaiveTime)> =
            busy.iter().map(|b| (b.start(), b.end())).collect();
        sorted.sort_unstable();

        let day_end = self.awake.end();
        let mut gaps = Vec::new();
        let mut cursor = self.awake.start();

        for (start, end) in sorted {
            if start >= day_end {
                break;
            }

            if cursor < start {
                // cursor < start < day_end, so the range is never empty
                if let Ok(gap) = TimeInterval::new(cursor, start) {
                    gaps.push(gap);
                }
            }

            cursor = cursor.max(end);
            if cursor >= day_end {
                return gaps;
            }
        }

        if cursor < day_end {
            if let Ok(gap) = TimeInterval::new(cursor, day_end) {
                gaps.push(gap);
            }
        }

        gaps
    }
}

impl Default for GapFinder {
    fn default() -> Self {
        Self::new(default_awake_window())
    }
}

/// Convenience function to find gaps in the default 08:00-22:00 window
pub fn find_gaps(busy: &[BusyPeriod]) -> Vec<TimeInterval> {
    GapFinder::default().find_gaps(busy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::BusySource;
    use proptest::prelude::*;

    fn busy(start: &str, end: &str) -> BusyPeriod {
        BusyPeriod {
            interval: TimeInterval::parse(start, end).unwrap(),
            source: BusySource::Timetable,
            label: String::new(),
        }
    }

    fn iv(start: &str, end: &str) -> TimeInterval {
        TimeInterval::parse(start, end).unwrap()
    }

    #[test]
    fn empty_day_is_one_full_gap() {
        assert_eq!(find_gaps(&[]), vec![iv("08:00", "22:00")]);
    }

    #[test]
    fn fully_covered_day_has_no_gaps() {
        assert!(find_gaps(&[busy("08:00", "22:00")]).is_empty());
        assert!(find_gaps(&[busy("07:00", "23:00")]).is_empty());
        assert!(find_gaps(&[busy("08:00", "15:00"), busy("12:00", "22:00")]).is_empty());
    }

    #[test]
    fn gaps_between_unsorted_overlapping_periods() {
        let gaps = find_gaps(&[
            busy("13:00", "14:00"),
            busy("09:00", "10:30"),
            busy("09:30", "10:00"),
            busy("13:30", "15:00"),
        ]);
        assert_eq!(
            gaps,
            vec![iv("08:00", "09:00"), iv("10:30", "13:00"), iv("15:00", "22:00")]
        );
    }

    #[test]
    fn periods_outside_window_are_clipped() {
        let gaps = find_gaps(&[busy("06:00", "08:30"), busy("21:30", "23:00")]);
        assert_eq!(gaps, vec![iv("08:30", "21:30")]);

        let after_hours = find_gaps(&[busy("22:30", "23:00")]);
        assert_eq!(after_hours, vec![iv("08:00", "22:00")]);
    }

    #[test]
    fn adjacent_periods_leave_no_sliver() {
        let gaps = find_gaps(&[busy("09:00", "10:00"), busy("10:00", "11:00")]);
        assert_eq!(gaps, vec![iv("08:00", "09:00"), iv("11:00", "22:00")]);
    }

    #[test]
    fn custom_awake_window() {
        let finder = GapFinder::new(iv("06:00", "09:00"));
        assert_eq!(
            finder.find_gaps(&[busy("07:00", "07:30")]),
            vec![iv("06:00", "07:00"), iv("07:30", "09:00")]
        );
    }

    fn minute(m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap()
    }

    fn arb_busy() -> impl Strategy<Value = Vec<BusyPeriod>> {
        prop::collection::vec((0u32..1430, 1u32..300), 0..12).prop_map(|spans| {
            spans
                .into_iter()
                .map(|(start, len)| BusyPeriod {
                    interval: TimeInterval::new(minute(start), minute((start + len).min(1439)))
                        .unwrap(),
                    source: BusySource::Task,
                    label: String::new(),
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_gaps_are_sorted_and_disjoint(periods in arb_busy()) {
            let gaps = find_gaps(&periods);
            for pair in gaps.windows(2) {
                prop_assert!(pair[0].end() < pair[1].start());
            }
        }

        #[test]
        fn prop_gaps_and_busy_reconstruct_awake_window(periods in arb_busy()) {
            let awake = default_awake_window();
            let gaps = find_gaps(&periods);
            let (lo, hi) = (8 * 60, 22 * 60);
            for m in lo..hi {
                let t = minute(m);
                let in_gap = gaps.iter().any(|g| g.start() <= t && t < g.end());
                let in_busy = periods.iter().any(|b| b.start() <= t && t < b.end());
                // every awake minute is covered exactly by one side
                prop_assert!(in_gap != in_busy, "minute {} gap={} busy={}", m, in_gap, in_busy);
            }
            for g in &gaps {
                prop_assert!(g.start() >= awake.start() && g.end() <= awake.end());
            }
        }
    }
}
