//! Interval summation.
//!
//! All hour figures in the engine come from one routine: select intervals by
//! status and start time, clip each to an effective end, and add up the
//! durations. Live figures clip to the evaluation instant; day figures clip
//! open intervals to the end of the calendar day.

use std::ops::RangeBounds;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{DutyInterval, DutyStatus, HosRuleType};

use super::timeline::{Timeline, validate_intervals};

const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Which intervals a summation counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSelector {
    /// Exactly one status.
    Only(DutyStatus),
    /// Every status except off duty (the weekly limit's definition).
    OnDuty,
}

impl StatusSelector {
    /// Returns true if `status` is counted.
    pub fn matches(self, status: DutyStatus) -> bool {
        match self {
            StatusSelector::Only(wanted) => status == wanted,
            StatusSelector::OnDuty => status.is_on_duty(),
        }
    }
}

/// Converts the span between two instants to hours.
///
/// Whole elapsed seconds divided by 3600; no rounding.
///
/// # Example
///
/// ```
/// use hos_engine::calculation::hours_between;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let start = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 3, 2, 13, 45, 0).unwrap();
/// assert_eq!(hours_between(start, end), Decimal::new(775, 2)); // 7.75
/// ```
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    duration_hours(end - start)
}

/// Converts a duration to hours.
pub fn duration_hours(duration: Duration) -> Decimal {
    Decimal::from(duration.num_seconds()) / SECONDS_PER_HOUR
}

/// Returns the `[start, end)` bounds of a UTC calendar day.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    (start, start + Duration::days(1))
}

/// Sums hours of intervals matching `selector` whose start falls in `starts`.
///
/// Durations are added up exactly and converted to hours once, so totals
/// built from repeating fractions of an hour still land on the limit.
fn clip_and_sum<'a>(
    intervals: impl Iterator<Item = &'a DutyInterval>,
    selector: StatusSelector,
    starts: impl RangeBounds<DateTime<Utc>>,
    effective_end: impl Fn(&DutyInterval) -> DateTime<Utc>,
) -> Decimal {
    let total = intervals
        .filter(|i| selector.matches(i.status) && starts.contains(&i.start_time))
        .fold(Duration::zero(), |total, i| {
            total + (effective_end(i) - i.start_time)
        });
    duration_hours(total)
}

/// Live summation over an already validated timeline.
pub(crate) fn sum_in_timeline(
    timeline: &Timeline<'_>,
    selector: StatusSelector,
    range_start: DateTime<Utc>,
) -> Decimal {
    let now = timeline.now();
    clip_and_sum(timeline.iter(), selector, range_start..=now, |i| {
        i.clipped_end(now)
    })
}

/// Sums hours of matching intervals that started in `[range_start, now]`.
///
/// Each interval is clipped to `min(end, now)`; open intervals run to `now`.
///
/// # Errors
///
/// Returns the timeline validation errors (`InvalidInterval`, `ClockSkew`).
///
/// # Example
///
/// ```
/// use hos_engine::calculation::{sum_status_hours, StatusSelector};
/// use hos_engine::models::{DutyInterval, DutyStatus};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::Driving, at(6), at(9), "I-80"),
///     DutyInterval::open(DutyStatus::Driving, at(10), "I-80"),
/// ];
///
/// let hours = sum_status_hours(
///     &intervals,
///     StatusSelector::Only(DutyStatus::Driving),
///     at(0),
///     at(12),
/// )
/// .unwrap();
/// assert_eq!(hours, Decimal::from(5));
/// ```
pub fn sum_status_hours(
    intervals: &[DutyInterval],
    selector: StatusSelector,
    range_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EngineResult<Decimal> {
    let timeline = Timeline::as_of(intervals, now)?;
    Ok(sum_in_timeline(&timeline, selector, range_start))
}

/// Sums hours of matching intervals that started during `day` (UTC).
///
/// Open intervals are clipped to the end of the day; closed intervals are
/// counted in full even if they run past midnight.
pub fn sum_status_hours_for_day(
    intervals: &[DutyInterval],
    selector: StatusSelector,
    day: NaiveDate,
) -> EngineResult<Decimal> {
    validate_intervals(intervals)?;
    let (start_of_day, end_of_day) = day_bounds(day);
    Ok(clip_and_sum(
        intervals.iter(),
        selector,
        start_of_day..end_of_day,
        |i| i.end_or(end_of_day),
    ))
}

/// Driving hours used since the window opened; zero when there is no window.
pub(crate) fn driving_hours_in_timeline(
    timeline: &Timeline<'_>,
    window_start: Option<DateTime<Utc>>,
) -> Decimal {
    match window_start {
        Some(start) => sum_in_timeline(timeline, StatusSelector::Only(DutyStatus::Driving), start),
        None => Decimal::ZERO,
    }
}

/// Driving hours used since `window_start`.
///
/// Without a window start the driver has a full budget, so the result is 0.
pub fn driving_hours_in_window(
    intervals: &[DutyInterval],
    window_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> EngineResult<Decimal> {
    let timeline = Timeline::as_of(intervals, now)?;
    Ok(driving_hours_in_timeline(&timeline, window_start))
}

/// On-duty hours over the rule's rolling lookback ending at the timeline's instant.
pub(crate) fn weekly_hours_in_timeline(timeline: &Timeline<'_>, rule: HosRuleType) -> Decimal {
    let range_start = timeline.now() - Duration::days(rule.lookback_days());
    sum_in_timeline(timeline, StatusSelector::OnDuty, range_start)
}

/// On-duty hours over the last 7 or 8 days ending at `now`.
pub fn weekly_hours_used(
    intervals: &[DutyInterval],
    rule: HosRuleType,
    now: DateTime<Utc>,
) -> EngineResult<Decimal> {
    let timeline = Timeline::as_of(intervals, now)?;
    Ok(weekly_hours_in_timeline(&timeline, rule))
}

/// On-duty hours over the lookback ending with `day`.
///
/// Intervals starting in `[start_of_day - lookback, end_of_day)` are counted,
/// so the range covers the lookback days before `day` plus `day` itself.
/// Open intervals are clipped to the end of `day`. Used for historical log
/// sheets rather than live evaluation.
///
/// # Example
///
/// ```
/// use hos_engine::calculation::rolling_total_as_of;
/// use hos_engine::models::{DutyInterval, DutyStatus, HosRuleType};
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let intervals: Vec<DutyInterval> = (1..=9)
///     .map(|d| {
///         DutyInterval::closed(
///             DutyStatus::OnDutyNotDriving,
///             Utc.with_ymd_and_hms(2026, 3, d, 8, 0, 0).unwrap(),
///             Utc.with_ymd_and_hms(2026, 3, d, 18, 0, 0).unwrap(),
///             "Depot",
///         )
///     })
///     .collect();
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
/// let total = rolling_total_as_of(&intervals, HosRuleType::SixtySeven, day).unwrap();
/// assert_eq!(total, Decimal::from(80)); // March 2nd through 9th
/// ```
pub fn rolling_total_as_of(
    intervals: &[DutyInterval],
    rule: HosRuleType,
    day: NaiveDate,
) -> EngineResult<Decimal> {
    validate_intervals(intervals)?;
    let (start_of_day, end_of_day) = day_bounds(day);
    let range_start = start_of_day - Duration::days(rule.lookback_days());
    Ok(clip_and_sum(
        intervals.iter(),
        StatusSelector::OnDuty,
        range_start..end_of_day,
        |i| i.end_or(end_of_day),
    ))
}

/// Rolling 8-day on-duty total for the 70-hour rule.
pub fn rolling_8_day_total(intervals: &[DutyInterval], day: NaiveDate) -> EngineResult<Decimal> {
    rolling_total_as_of(intervals, HosRuleType::SeventyEight, day)
}

/// Rolling 7-day on-duty total for the 60-hour rule.
pub fn rolling_7_day_total(intervals: &[DutyInterval], day: NaiveDate) -> EngineResult<Decimal> {
    rolling_total_as_of(intervals, HosRuleType::SixtySeven, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn driving() -> StatusSelector {
        StatusSelector::Only(DutyStatus::Driving)
    }

    // ==========================================================================
    // Live summation
    // ==========================================================================

    #[test]
    fn test_hrs_001_closed_intervals_summed() {
        let intervals = vec![
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 9, 30), "A"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 10, 0), at(2, 12, 15), "B"),
        ];

        let hours = sum_status_hours(&intervals, driving(), at(2, 0, 0), at(2, 13, 0)).unwrap();
        assert_eq!(hours, dec("5.75"));
    }

    #[test]
    fn test_hrs_002_open_interval_clipped_to_now() {
        let intervals = vec![DutyInterval::open(DutyStatus::Driving, at(2, 6, 0), "A")];

        let hours = sum_status_hours(&intervals, driving(), at(2, 0, 0), at(2, 8, 20)).unwrap();
        assert_eq!(hours, hours_between(at(2, 6, 0), at(2, 8, 20)));
    }

    #[test]
    fn test_hrs_003_closed_interval_ending_after_now_clipped() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 6, 0),
            at(2, 14, 0),
            "A",
        )];

        let hours = sum_status_hours(&intervals, driving(), at(2, 0, 0), at(2, 9, 0)).unwrap();
        assert_eq!(hours, dec("3"));
    }

    #[test]
    fn test_hrs_004_interval_starting_before_range_excluded() {
        let intervals = vec![
            DutyInterval::closed(DutyStatus::Driving, at(2, 5, 0), at(2, 7, 0), "A"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 8, 0), at(2, 9, 0), "B"),
        ];

        let hours = sum_status_hours(&intervals, driving(), at(2, 6, 0), at(2, 10, 0)).unwrap();
        assert_eq!(hours, dec("1"));
    }

    #[test]
    fn test_hrs_005_range_start_is_inclusive() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 6, 0),
            at(2, 7, 0),
            "A",
        )];

        let hours = sum_status_hours(&intervals, driving(), at(2, 6, 0), at(2, 10, 0)).unwrap();
        assert_eq!(hours, dec("1"));
    }

    #[test]
    fn test_hrs_006_on_duty_selector_excludes_only_off_duty() {
        let intervals = vec![
            DutyInterval::closed(DutyStatus::OffDuty, at(2, 0, 0), at(2, 6, 0), "A"),
            DutyInterval::closed(DutyStatus::SleeperBerth, at(2, 6, 0), at(2, 8, 0), "B"),
            DutyInterval::closed(DutyStatus::OnDutyNotDriving, at(2, 8, 0), at(2, 9, 0), "C"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 9, 0), at(2, 12, 0), "D"),
        ];

        let hours = sum_status_hours(
            &intervals,
            StatusSelector::OnDuty,
            at(2, 0, 0),
            at(2, 12, 0),
        )
        .unwrap();
        assert_eq!(hours, dec("6"));
    }

    #[test]
    fn test_hrs_007_seconds_are_not_rounded() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 6, 0),
            at(2, 6, 0) + Duration::seconds(90),
            "A",
        )];

        let hours = sum_status_hours(&intervals, driving(), at(2, 0, 0), at(2, 7, 0)).unwrap();
        assert_eq!(hours, Decimal::from(90) / Decimal::from(3600));
    }

    #[test]
    fn test_hrs_008_invalid_interval_propagates() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 9, 0),
            at(2, 8, 0),
            "A",
        )];

        let result = sum_status_hours(&intervals, driving(), at(2, 0, 0), at(2, 10, 0));
        assert!(matches!(result, Err(EngineError::InvalidInterval { .. })));
    }

    #[test]
    fn test_hrs_009_twenty_minute_pieces_sum_exactly() {
        // 210 pieces of 20 minutes: 70 hours, each piece a repeating fraction.
        let intervals: Vec<DutyInterval> = (0..210)
            .map(|n| {
                let start = at(1, 0, 0) + Duration::minutes(20 * n);
                DutyInterval::closed(
                    DutyStatus::OnDutyNotDriving,
                    start,
                    start + Duration::minutes(20),
                    "X",
                )
            })
            .collect();

        let hours = sum_status_hours(
            &intervals,
            StatusSelector::OnDuty,
            at(1, 0, 0),
            at(9, 0, 0),
        )
        .unwrap();
        assert_eq!(hours, dec("70"));
    }

    #[test]
    fn test_hrs_010_mixed_repeating_pieces_sum_exactly() {
        // 1h20m + 20m + 40m + 1h40m = 4h.
        let intervals = vec![
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 7, 20), "A"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 7, 30), at(2, 7, 50), "B"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 8, 0), at(2, 8, 40), "C"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 9, 0), at(2, 10, 40), "D"),
        ];

        let live = sum_status_hours(&intervals, driving(), at(2, 0, 0), at(2, 12, 0)).unwrap();
        let day = sum_status_hours_for_day(&intervals, driving(), date(2)).unwrap();
        assert_eq!(live, dec("4"));
        assert_eq!(day, dec("4"));
    }

    #[test]
    fn test_driving_hours_without_window_is_zero() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 6, 0),
            at(2, 9, 0),
            "A",
        )];

        let hours = driving_hours_in_window(&intervals, None, at(2, 10, 0)).unwrap();
        assert_eq!(hours, Decimal::ZERO);
    }

    #[test]
    fn test_weekly_lookback_depends_on_rule() {
        // 10 hours on each of March 1..=8, evaluated at midnight starting March 9.
        let intervals: Vec<DutyInterval> = (1..=8)
            .map(|d| {
                DutyInterval::closed(DutyStatus::OnDutyNotDriving, at(d, 8, 0), at(d, 18, 0), "X")
            })
            .collect();
        let now = at(9, 0, 0);

        assert_eq!(
            weekly_hours_used(&intervals, HosRuleType::SeventyEight, now).unwrap(),
            dec("80")
        );
        assert_eq!(
            weekly_hours_used(&intervals, HosRuleType::SixtySeven, now).unwrap(),
            dec("70")
        );
    }

    // ==========================================================================
    // Day-anchored summation
    // ==========================================================================

    #[test]
    fn test_day_001_open_interval_clipped_to_end_of_day() {
        let intervals = vec![DutyInterval::open(DutyStatus::OffDuty, at(2, 18, 0), "A")];

        let hours = sum_status_hours_for_day(
            &intervals,
            StatusSelector::Only(DutyStatus::OffDuty),
            date(2),
        )
        .unwrap();
        assert_eq!(hours, dec("6"));
    }

    #[test]
    fn test_day_002_closed_interval_past_midnight_counted_in_full() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::SleeperBerth,
            at(2, 22, 0),
            at(3, 6, 0),
            "A",
        )];

        let on_start_day = sum_status_hours_for_day(
            &intervals,
            StatusSelector::Only(DutyStatus::SleeperBerth),
            date(2),
        )
        .unwrap();
        let on_next_day = sum_status_hours_for_day(
            &intervals,
            StatusSelector::Only(DutyStatus::SleeperBerth),
            date(3),
        )
        .unwrap();

        assert_eq!(on_start_day, dec("8"));
        assert_eq!(on_next_day, Decimal::ZERO);
    }

    #[test]
    fn test_day_003_midnight_start_belongs_to_new_day() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(3, 0, 0),
            at(3, 2, 0),
            "A",
        )];

        assert_eq!(
            sum_status_hours_for_day(&intervals, driving(), date(2)).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            sum_status_hours_for_day(&intervals, driving(), date(3)).unwrap(),
            dec("2")
        );
    }

    #[test]
    fn test_day_004_future_intervals_are_not_clock_skew() {
        // Day-anchored sums have no evaluation instant.
        let intervals = vec![DutyInterval::open(DutyStatus::Driving, at(20, 6, 0), "A")];
        assert!(sum_status_hours_for_day(&intervals, driving(), date(2)).is_ok());
    }

    #[test]
    fn test_rolling_totals_include_the_day_and_lookback_before_it() {
        let intervals: Vec<DutyInterval> = (1..=9)
            .map(|d| {
                DutyInterval::closed(DutyStatus::OnDutyNotDriving, at(d, 8, 0), at(d, 17, 0), "X")
            })
            .collect();

        // March 1st..=9th and March 2nd..=9th.
        assert_eq!(rolling_8_day_total(&intervals, date(9)).unwrap(), dec("81"));
        assert_eq!(rolling_7_day_total(&intervals, date(9)).unwrap(), dec("72"));
    }

    #[test]
    fn test_rolling_total_boundary_day() {
        // Only March 1st and March 2nd carry hours.
        let intervals = vec![
            DutyInterval::closed(DutyStatus::Driving, at(1, 0, 0), at(1, 5, 0), "X"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 9, 0), "Y"),
        ];

        // The first day of the lookback is counted from its midnight.
        assert_eq!(rolling_8_day_total(&intervals, date(9)).unwrap(), dec("8"));
        assert_eq!(rolling_8_day_total(&intervals, date(10)).unwrap(), dec("3"));
        assert_eq!(rolling_7_day_total(&intervals, date(9)).unwrap(), dec("3"));
        assert_eq!(rolling_7_day_total(&intervals, date(8)).unwrap(), dec("8"));
    }

    #[test]
    fn test_rolling_total_clips_open_interval_to_end_of_day() {
        let intervals = vec![DutyInterval::open(DutyStatus::Driving, at(5, 20, 0), "X")];

        let total = rolling_total_as_of(&intervals, HosRuleType::SeventyEight, date(5)).unwrap();
        assert_eq!(total, dec("4"));
    }

    #[test]
    fn test_day_bounds_span_one_day() {
        let (start, end) = day_bounds(date(2));
        assert_eq!(start, at(2, 0, 0));
        assert_eq!(end, at(3, 0, 0));
    }
}
