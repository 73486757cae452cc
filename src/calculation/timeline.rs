//! Validation and ordering of a driver's interval list.
//!
//! Every live calculation runs over a [`Timeline`]: the caller's intervals,
//! checked against the evaluation instant and sorted by start time. The
//! timeline tolerates overlapping intervals and more than one open interval;
//! it only rejects data no calculation can be made from.

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::DutyInterval;

/// A validated, chronologically ordered view of a driver's intervals as of
/// one instant.
///
/// # Example
///
/// ```
/// use hos_engine::calculation::Timeline;
/// use hos_engine::models::{DutyInterval, DutyStatus};
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
/// let intervals = vec![
///     DutyInterval::open(DutyStatus::Driving, Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(), "Elko, NV"),
///     DutyInterval::closed(
///         DutyStatus::OffDuty,
///         Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap(),
///         Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(),
///         "Elko, NV",
///     ),
/// ];
///
/// let timeline = Timeline::as_of(&intervals, now).unwrap();
/// let first = timeline.iter().next().unwrap();
/// assert_eq!(first.status, DutyStatus::OffDuty);
/// ```
#[derive(Debug, Clone)]
pub struct Timeline<'a> {
    intervals: Vec<&'a DutyInterval>,
    now: DateTime<Utc>,
}

impl<'a> Timeline<'a> {
    /// Validates `intervals` against `now` and orders them by start time.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInterval`] if any interval ends before it starts.
    /// - [`EngineError::ClockSkew`] if any interval starts after `now`.
    pub fn as_of(intervals: &'a [DutyInterval], now: DateTime<Utc>) -> EngineResult<Self> {
        validate_intervals(intervals)?;

        if let Some(future) = intervals.iter().find(|i| i.start_time > now) {
            return Err(EngineError::ClockSkew {
                start_time: future.start_time,
                now,
            });
        }

        Ok(Self {
            intervals: sorted(intervals),
            now,
        })
    }

    /// The evaluation instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Iterates intervals oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a DutyInterval> + '_ {
        self.intervals.iter().copied()
    }

    /// Returns true if there is no history at all.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Rejects intervals whose end precedes their start.
pub fn validate_intervals(intervals: &[DutyInterval]) -> EngineResult<()> {
    for interval in intervals {
        if let Some(end) = interval.end_time() {
            if end < interval.start_time {
                return Err(EngineError::InvalidInterval {
                    start_time: interval.start_time,
                    message: format!("end time {} is before start time", end),
                });
            }
        }
    }
    Ok(())
}

/// Returns references to `intervals` ordered by start time.
///
/// The sort is stable, so intervals sharing a start keep their input order.
pub(crate) fn sorted(intervals: &[DutyInterval]) -> Vec<&DutyInterval> {
    let mut ordered: Vec<&DutyInterval> = intervals.iter().collect();
    ordered.sort_by_key(|i| i.start_time);
    ordered
}

/// Finds neighbouring intervals that overlap once ordered by start time.
///
/// An open interval overlaps anything that starts after it. Touching
/// intervals (one ends exactly when the next starts) do not overlap.
///
/// # Example
///
/// ```
/// use hos_engine::calculation::overlapping_pairs;
/// use hos_engine::models::{DutyInterval, DutyStatus};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::OnDutyNotDriving, at(6), at(8), "Yard"),
///     DutyInterval::closed(DutyStatus::Driving, at(7), at(10), "I-80"),
/// ];
/// assert_eq!(overlapping_pairs(&intervals).len(), 1);
/// ```
pub fn overlapping_pairs(intervals: &[DutyInterval]) -> Vec<(&DutyInterval, &DutyInterval)> {
    let ordered = sorted(intervals);
    ordered
        .windows(2)
        .filter(|pair| match pair[0].end_time() {
            None => true,
            Some(end) => end > pair[1].start_time,
        })
        .map(|pair| (pair[0], pair[1]))
        .collect()
}
