//! Free-slot computation for a single court and day.
//!
//! Everything here is pure: callers gather the occupied ranges (bookings and
//! admin blocks) and the club's hours, and get back the bookable slots.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::common::hhmm;

/// Length of every bookable slot.
pub const SLOT_MINUTES: i64 = 90;

/// Half-open `[start_time, end_time)` interval within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct TimeRange {
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "18:00"))]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "19:30"))]
    pub end_time: NaiveTime,
}

impl TimeRange {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// The slot starting at `start`, or `None` if it would run past midnight.
    pub fn slot(start: NaiveTime) -> Option<Self> {
        let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
        (wrapped == 0).then(|| Self::new(start, end))
    }

    /// Half-open overlap test. Touching ranges do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }
}

/// Opening hours in force for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

/// Narrow the configured slot starts to those that fit inside `hours`.
///
/// `None` means the club is closed that day.
pub fn day_slot_starts(candidates: &[NaiveTime], hours: Option<OpeningHours>) -> Vec<NaiveTime> {
    let Some(hours) = hours else {
        return Vec::new();
    };
    candidates
        .iter()
        .copied()
        .filter(|start| *start >= hours.opens_at)
        .filter(|start| {
            TimeRange::slot(*start).is_some_and(|slot| slot.end_time <= hours.closes_at)
        })
        .collect()
}

/// Slots from `slot_starts` that overlap nothing in `occupied`.
///
/// When `now` is given (the date is today in club time), slots starting at
/// or before it are dropped too.
pub fn available_slots(
    slot_starts: &[NaiveTime],
    occupied: &[TimeRange],
    now: Option<NaiveTime>,
) -> Vec<TimeRange> {
    slot_starts
        .iter()
        .filter(|start| now.map_or(true, |now| **start > now))
        .filter_map(|start| TimeRange::slot(*start))
        .filter(|slot| !occupied.iter().any(|busy| slot.overlaps(busy)))
        .collect()
}
