//! 30-minute rest break monitoring.
//!
//! A break is owed once cumulative driving since the last qualifying gap
//! reaches the configured threshold (8 hours by default). Any gap of at least
//! `min_rest_break_minutes` before a driving interval counts as the break,
//! whatever the driver was doing during it.

use chrono::{DateTime, Duration, Utc};

use crate::config::HosConfig;
use crate::error::EngineResult;
use crate::models::{DutyInterval, DutyStatus};

use super::hours::duration_hours;
use super::timeline::Timeline;
use super::window::window_start_in_timeline;

/// Decides whether a break is owed, given the window start.
///
/// Driving intervals starting in `[window_start, now]` are walked in order.
/// A driving interval preceded by a qualifying gap resets the counter and is
/// itself not added; the gap is what satisfied the previous break.
pub(crate) fn rest_break_required_in_timeline(
    timeline: &Timeline<'_>,
    window_start: Option<DateTime<Utc>>,
    config: &HosConfig,
) -> bool {
    let Some(window_start) = window_start else {
        return false;
    };

    let now = timeline.now();
    let min_break = config.min_rest_break();
    let mut cumulative = Duration::zero();
    let mut last_break_time = window_start;

    let driving = timeline.iter().filter(|i| {
        i.status == DutyStatus::Driving && i.start_time >= window_start && i.start_time <= now
    });

    for interval in driving {
        let end = interval.clipped_end(now);

        if interval.start_time > last_break_time
            && interval.start_time - last_break_time >= min_break
        {
            cumulative = Duration::zero();
            last_break_time = end;
            continue;
        }

        cumulative = cumulative + (end - interval.start_time);
        if duration_hours(cumulative) >= config.rest_break_after_hours {
            return true;
        }
        last_break_time = end;
    }

    false
}

/// Returns true if the driver must take a rest break before driving again.
///
/// Always false when there is no duty window start.
///
/// # Errors
///
/// Returns the timeline validation errors (`InvalidInterval`, `ClockSkew`).
///
/// # Example
///
/// ```
/// use hos_engine::calculation::is_rest_break_required;
/// use hos_engine::config::HosConfig;
/// use hos_engine::models::{DutyInterval, DutyStatus};
/// use chrono::{TimeZone, Utc};
///
/// let at = |d, h| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::OffDuty, at(1, 20), at(2, 6), "Ogden, UT"),
///     DutyInterval::open(DutyStatus::Driving, at(2, 6), "I-84"),
/// ];
/// let config = HosConfig::default();
///
/// assert!(!is_rest_break_required(&intervals, at(2, 13), &config).unwrap());
/// assert!(is_rest_break_required(&intervals, at(2, 14), &config).unwrap());
/// ```
pub fn is_rest_break_required(
    intervals: &[DutyInterval],
    now: DateTime<Utc>,
    config: &HosConfig,
) -> EngineResult<bool> {
    let timeline = Timeline::as_of(intervals, now)?;
    let window_start = window_start_in_timeline(&timeline, config);
    Ok(rest_break_required_in_timeline(&timeline, window_start, config))
}
