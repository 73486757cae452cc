//! 14-hour duty window detection.
//!
//! A duty window opens when the driver finishes a qualifying off-duty period
//! (10 consecutive hours by default) and closes a fixed number of hours later.
//! Only [`DutyStatus::OffDuty`] intervals qualify; sleeper berth time does not
//! open a window on its own.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::HosConfig;
use crate::error::EngineResult;
use crate::models::{DutyInterval, DutyStatus};

use super::hours::hours_between;
use super::timeline::Timeline;

/// Finds the start of the current duty window in an already validated timeline.
pub(crate) fn window_start_in_timeline(
    timeline: &Timeline<'_>,
    config: &HosConfig,
) -> Option<DateTime<Utc>> {
    let now = timeline.now();
    timeline
        .iter()
        .rev()
        .filter(|i| i.status == DutyStatus::OffDuty)
        .map(|i| (i.start_time, i.clipped_end(now)))
        .find(|(start, end)| hours_between(*start, *end) >= config.min_off_duty_hours)
        .map(|(_, end)| end)
}

/// Finds when the current duty window opened.
///
/// Off-duty intervals are examined most recent first, each clipped to `now`.
/// The first one lasting at least `min_off_duty_hours` qualifies and its
/// (clipped) end is the window start. Returns `None` if no off-duty period in
/// the history is long enough; callers treat that as a full budget.
///
/// An off-duty period still in progress qualifies once it has run for the
/// minimum, in which case the window start is `now` itself.
///
/// # Errors
///
/// Returns the timeline validation errors (`InvalidInterval`, `ClockSkew`).
///
/// # Example
///
/// ```
/// use hos_engine::calculation::find_window_start;
/// use hos_engine::config::HosConfig;
/// use hos_engine::models::{DutyInterval, DutyStatus};
/// use chrono::{TimeZone, Utc};
///
/// let at = |d, h| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::OffDuty, at(1, 20), at(2, 6), "Reno, NV"),
///     DutyInterval::open(DutyStatus::Driving, at(2, 6), "Reno, NV"),
/// ];
///
/// let start = find_window_start(&intervals, at(2, 9), &HosConfig::default()).unwrap();
/// assert_eq!(start, Some(at(2, 6)));
/// ```
pub fn find_window_start(
    intervals: &[DutyInterval],
    now: DateTime<Utc>,
    config: &HosConfig,
) -> EngineResult<Option<DateTime<Utc>>> {
    let timeline = Timeline::as_of(intervals, now)?;
    Ok(window_start_in_timeline(&timeline, config))
}

/// Hours left in the duty window at `now`.
///
/// The full window length when there is no window start; never negative.
pub fn window_hours_remaining(
    window_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    config: &HosConfig,
) -> Decimal {
    match window_start {
        Some(start) => {
            let remaining = config.max_duty_window_hours - hours_between(start, now);
            remaining.max(Decimal::ZERO)
        }
        None => config.max_duty_window_hours,
    }
}
