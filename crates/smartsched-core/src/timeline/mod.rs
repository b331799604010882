//! Free-time derivation.
//!
//! This module provides:
//! - Busy-period aggregation from timetable entries and scheduled tasks
//! - Gap detection within the awake window
//! - Filtering of gaps down to slots that fit a task

mod calendar;
mod candidate;
mod gap;

pub use calendar::{BusyCalendar, CalendarAggregator};
pub use candidate::filter_candidates;
pub use gap::{find_gaps, GapFinder};
