//! Compliance evaluation.
//!
//! Combines the window, hours and rest break calculations into a single
//! [`ComplianceSnapshot`] for one driver at one instant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::HosConfig;
use crate::error::EngineResult;
use crate::models::{ComplianceSnapshot, DriverProfile, DutyInterval, DutyStatus};

use super::hours::{driving_hours_in_timeline, weekly_hours_in_timeline};
use super::rest_break::rest_break_required_in_timeline;
use super::timeline::Timeline;
use super::window::{window_hours_remaining, window_start_in_timeline};

/// Status of the most recent interval still running at the timeline's instant.
fn current_status_in_timeline(timeline: &Timeline<'_>) -> DutyStatus {
    let now = timeline.now();
    timeline
        .iter()
        .rev()
        .find(|i| i.end_time().is_none_or(|end| end > now))
        .map(|i| i.status)
        .unwrap_or(DutyStatus::OffDuty)
}

/// Returns the driver's duty status at `now`.
///
/// The status of the most recently started interval that is still running
/// at `now`: open, or closed at some later instant. Off duty if there is none.
///
/// # Example
///
/// ```
/// use hos_engine::calculation::current_duty_status;
/// use hos_engine::models::{DutyInterval, DutyStatus};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::OnDutyNotDriving, at(6), at(7), "Yard"),
///     DutyInterval::open(DutyStatus::Driving, at(7), "I-80"),
/// ];
///
/// assert_eq!(current_duty_status(&intervals, at(9)).unwrap(), DutyStatus::Driving);
/// assert_eq!(current_duty_status(&[], at(9)).unwrap(), DutyStatus::OffDuty);
/// ```
pub fn current_duty_status(
    intervals: &[DutyInterval],
    now: DateTime<Utc>,
) -> EngineResult<DutyStatus> {
    let timeline = Timeline::as_of(intervals, now)?;
    Ok(current_status_in_timeline(&timeline))
}

/// Evaluates a driver's compliance position at `now`.
///
/// # Arguments
///
/// * `driver` - The driver, used for the weekly rule
/// * `intervals` - The driver's duty intervals, in any order
/// * `now` - The evaluation instant; a past instant gives the historical view
/// * `config` - The regulatory limits
///
/// # Returns
///
/// A [`ComplianceSnapshot`] where:
/// - `available_driving_hours` is the driving limit remainder, capped by the
///   window remainder
/// - `can_drive` requires a positive driving limit remainder (before the window
///   cap), a positive window remainder, no rest break owed and a positive weekly
///   remainder
///
/// An empty history is a valid zero state: full budgets and off duty.
///
/// # Errors
///
/// Returns the timeline validation errors (`InvalidInterval`, `ClockSkew`).
///
/// # Examples
///
/// ## Driver with no history
///
/// ```
/// use hos_engine::calculation::evaluate;
/// use hos_engine::config::HosConfig;
/// use hos_engine::models::{DriverProfile, DutyStatus, HosRuleType};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let driver = DriverProfile::new("DRV-001", HosRuleType::SeventyEight);
/// let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
///
/// let snapshot = evaluate(&driver, &[], now, &HosConfig::default()).unwrap();
/// assert_eq!(snapshot.available_driving_hours, Decimal::from(11));
/// assert_eq!(snapshot.window_hours_remaining, Decimal::from(14));
/// assert_eq!(snapshot.current_duty_status, DutyStatus::OffDuty);
/// assert!(snapshot.can_drive);
/// ```
///
/// ## Seven hours into a fresh window
///
/// ```
/// use hos_engine::calculation::evaluate;
/// use hos_engine::config::HosConfig;
/// use hos_engine::models::{DriverProfile, DutyInterval, DutyStatus, HosRuleType};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let at = |d, h| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
/// let driver = DriverProfile::new("DRV-001", HosRuleType::SeventyEight);
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::OffDuty, at(1, 20), at(2, 6), "Sparks, NV"),
///     DutyInterval::open(DutyStatus::Driving, at(2, 6), "I-80"),
/// ];
///
/// let snapshot = evaluate(&driver, &intervals, at(2, 13), &HosConfig::default()).unwrap();
/// assert_eq!(snapshot.driving_hours_used, Decimal::from(7));
/// assert_eq!(snapshot.available_driving_hours, Decimal::from(4));
/// assert_eq!(snapshot.window_hours_remaining, Decimal::from(7));
/// assert!(snapshot.can_drive);
/// ```
pub fn evaluate(
    driver: &DriverProfile,
    intervals: &[DutyInterval],
    now: DateTime<Utc>,
    config: &HosConfig,
) -> EngineResult<ComplianceSnapshot> {
    let timeline = Timeline::as_of(intervals, now)?;

    let current_duty_status = current_status_in_timeline(&timeline);

    let window_start = window_start_in_timeline(&timeline, config);
    let window_hours_remaining = window_hours_remaining(window_start, now, config);

    let driving_hours_used = driving_hours_in_timeline(&timeline, window_start);
    let driving_remaining = (config.max_driving_hours - driving_hours_used).max(Decimal::ZERO);
    let available_driving_hours = driving_remaining.min(window_hours_remaining);

    let weekly_hours_used = weekly_hours_in_timeline(&timeline, driver.hos_rule_type);
    let weekly_cap = driver.hos_rule_type.weekly_cap(config);
    let weekly_hours_available = (weekly_cap - weekly_hours_used).max(Decimal::ZERO);

    let rest_break_required = rest_break_required_in_timeline(&timeline, window_start, config);

    let can_drive = driving_remaining > Decimal::ZERO
        && window_hours_remaining > Decimal::ZERO
        && !rest_break_required
        && weekly_hours_available > Decimal::ZERO;

    debug!(
        driver_id = %driver.id,
        evaluated_at = %now,
        driving_hours_used = %driving_hours_used,
        window_hours_remaining = %window_hours_remaining,
        weekly_hours_used = %weekly_hours_used,
        rest_break_required,
        can_drive,
        "Evaluated HOS compliance"
    );

    Ok(ComplianceSnapshot {
        evaluated_at: now,
        window_start,
        available_driving_hours,
        window_hours_remaining,
        driving_hours_used,
        weekly_hours_used,
        weekly_hours_available,
        rest_break_required,
        current_duty_status,
        can_drive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::HosRuleType;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
    }

    fn driver() -> DriverProfile {
        DriverProfile::new("DRV-001", HosRuleType::SeventyEight)
    }

    fn config() -> HosConfig {
        HosConfig::default()
    }

    /// Ten hours off duty ending at 06:00 on March 2nd.
    fn reset() -> DutyInterval {
        DutyInterval::closed(DutyStatus::OffDuty, at(1, 20, 0), at(2, 6, 0), "Terminal")
    }

    // ==========================================================================
    // Zero state
    // ==========================================================================

    #[test]
    fn test_cmp_001_empty_history_has_full_budgets() {
        let snapshot = evaluate(&driver(), &[], at(2, 12, 0), &config()).unwrap();

        assert_eq!(snapshot.available_driving_hours, dec("11"));
        assert_eq!(snapshot.window_hours_remaining, dec("14"));
        assert_eq!(snapshot.driving_hours_used, Decimal::ZERO);
        assert_eq!(snapshot.weekly_hours_used, Decimal::ZERO);
        assert_eq!(snapshot.weekly_hours_available, dec("70"));
        assert_eq!(snapshot.window_start, None);
        assert!(!snapshot.rest_break_required);
        assert!(snapshot.can_drive);
    }

    #[test]
    fn test_cmp_002_sixty_seven_rule_uses_sixty_hour_cap() {
        let driver = DriverProfile::new("DRV-002", HosRuleType::SixtySeven);
        let snapshot = evaluate(&driver, &[], at(2, 12, 0), &config()).unwrap();
        assert_eq!(snapshot.weekly_hours_available, dec("60"));
    }

    // ==========================================================================
    // Driving and window limits
    // ==========================================================================

    #[test]
    fn test_cmp_003_seven_hours_driving() {
        let intervals = vec![
            reset(),
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 13, 0), "A"),
        ];

        let snapshot = evaluate(&driver(), &intervals, at(2, 13, 0), &config()).unwrap();

        assert_eq!(snapshot.window_start, Some(at(2, 6, 0)));
        assert_eq!(snapshot.driving_hours_used, dec("7"));
        assert_eq!(snapshot.window_hours_remaining, dec("7"));
        assert_eq!(snapshot.available_driving_hours, dec("4"));
        assert!(!snapshot.rest_break_required);
        assert!(snapshot.can_drive);
    }

    #[test]
    fn test_cmp_004_eight_hours_driving_owes_break() {
        let intervals = vec![
            reset(),
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 14, 0), "A"),
        ];

        let snapshot = evaluate(&driver(), &intervals, at(2, 14, 0), &config()).unwrap();

        assert_eq!(snapshot.driving_hours_used, dec("8"));
        assert!(snapshot.rest_break_required);
        assert!(!snapshot.can_drive);
    }

    #[test]
    fn test_cmp_005_eleven_hours_exhausts_driving() {
        let intervals = vec![
            reset(),
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 11, 0), "A"),
            DutyInterval::closed(DutyStatus::OffDuty, at(2, 11, 0), at(2, 11, 30), "B"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 11, 30), at(2, 12, 0), "C"),
            DutyInterval::closed(DutyStatus::Driving, at(2, 12, 0), at(2, 17, 30), "D"),
        ];

        let snapshot = evaluate(&driver(), &intervals, at(2, 17, 30), &config()).unwrap();

        assert_eq!(snapshot.driving_hours_used, dec("11"));
        assert_eq!(snapshot.available_driving_hours, Decimal::ZERO);
        assert!(!snapshot.can_drive);
    }

    #[test]
    fn test_cmp_006_window_binding_keeps_can_drive_true() {
        // Two hours of driving, then a long on-duty stretch: the window is the
        // binding constraint while the driving limit still has room.
        let intervals = vec![
            reset(),
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 8, 0), "A"),
            DutyInterval::open(DutyStatus::OnDutyNotDriving, at(2, 8, 0), "B"),
        ];

        let now = at(2, 17, 0);
        let snapshot = evaluate(&driver(), &intervals, now, &config()).unwrap();

        assert_eq!(snapshot.window_hours_remaining, dec("3"));
        assert_eq!(snapshot.available_driving_hours, dec("3"));
        assert!(snapshot.can_drive);
    }

    #[test]
    fn test_cmp_007_window_exhausted_blocks_driving() {
        let intervals = vec![
            reset(),
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 8, 0), "A"),
            DutyInterval::open(DutyStatus::OnDutyNotDriving, at(2, 8, 0), "B"),
        ];

        let snapshot = evaluate(&driver(), &intervals, at(2, 20, 0), &config()).unwrap();

        assert_eq!(snapshot.window_hours_remaining, Decimal::ZERO);
        assert_eq!(snapshot.available_driving_hours, Decimal::ZERO);
        assert!(!snapshot.can_drive);
    }

    #[test]
    fn test_cmp_008_without_window_driving_used_is_zero() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 0, 0),
            at(2, 9, 0),
            "A",
        )];

        let snapshot = evaluate(&driver(), &intervals, at(2, 9, 0), &config()).unwrap();

        assert_eq!(snapshot.window_start, None);
        assert_eq!(snapshot.driving_hours_used, Decimal::ZERO);
        assert_eq!(snapshot.available_driving_hours, dec("11"));
        assert_eq!(snapshot.weekly_hours_used, dec("9"));
    }

    // ==========================================================================
    // Weekly limit
    // ==========================================================================

    #[test]
    fn test_cmp_009_weekly_cap_exhausted_blocks_driving() {
        // 8.75 hours on duty on each of eight days, then a fresh reset.
        let mut intervals: Vec<DutyInterval> = (1..=8)
            .map(|d| {
                DutyInterval::closed(
                    DutyStatus::OnDutyNotDriving,
                    at(d, 8, 0),
                    at(d, 16, 45),
                    "Dock",
                )
            })
            .collect();
        intervals.push(DutyInterval::closed(
            DutyStatus::OffDuty,
            at(8, 16, 45),
            at(9, 8, 0),
            "Home",
        ));

        let snapshot = evaluate(&driver(), &intervals, at(9, 8, 0), &config()).unwrap();

        assert_eq!(snapshot.weekly_hours_used, dec("70"));
        assert_eq!(snapshot.weekly_hours_available, Decimal::ZERO);
        assert_eq!(snapshot.available_driving_hours, dec("11"));
        assert_eq!(snapshot.window_hours_remaining, dec("14"));
        assert!(!snapshot.can_drive);
    }

    #[test]
    fn test_cmp_010_sleeper_berth_counts_toward_weekly() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::SleeperBerth,
            at(2, 0, 0),
            at(2, 8, 0),
            "Cab",
        )];

        let snapshot = evaluate(&driver(), &intervals, at(2, 8, 0), &config()).unwrap();
        assert_eq!(snapshot.weekly_hours_used, dec("8"));
    }

    // ==========================================================================
    // Current status and validation
    // ==========================================================================

    #[test]
    fn test_cmp_011_current_status_from_open_interval() {
        let intervals = vec![
            reset(),
            DutyInterval::open(DutyStatus::Driving, at(2, 6, 0), "A"),
        ];

        let snapshot = evaluate(&driver(), &intervals, at(2, 7, 0), &config()).unwrap();
        assert_eq!(snapshot.current_duty_status, DutyStatus::Driving);
    }

    #[test]
    fn test_cmp_012_closed_history_is_off_duty() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 6, 0),
            at(2, 8, 0),
            "A",
        )];

        let status = current_duty_status(&intervals, at(2, 9, 0)).unwrap();
        assert_eq!(status, DutyStatus::OffDuty);
    }

    #[test]
    fn test_cmp_013_interval_closed_after_now_is_current() {
        let intervals = vec![DutyInterval::closed(
            DutyStatus::Driving,
            at(2, 6, 0),
            at(2, 10, 0),
            "A",
        )];

        let status = current_duty_status(&intervals, at(2, 9, 0)).unwrap();
        assert_eq!(status, DutyStatus::Driving);
    }

    #[test]
    fn test_cmp_014_clock_skew_is_rejected() {
        let intervals = vec![DutyInterval::open(DutyStatus::Driving, at(2, 10, 0), "A")];

        let result = evaluate(&driver(), &intervals, at(2, 9, 0), &config());
        match result {
            Err(EngineError::ClockSkew { start_time, .. }) => {
                assert_eq!(start_time, at(2, 10, 0));
            }
            _ => panic!("Expected ClockSkew error"),
        }
    }

    #[test]
    fn test_cmp_015_historical_view_ignores_later_intervals_by_clipping() {
        let intervals = vec![
            reset(),
            DutyInterval::closed(DutyStatus::Driving, at(2, 6, 0), at(2, 12, 0), "A"),
        ];
        let audit = at(2, 9, 0);

        let historical = evaluate(&driver(), &intervals, audit, &config()).unwrap();
        let truncated = vec![
            reset(),
            DutyInterval::open(DutyStatus::Driving, at(2, 6, 0), "A"),
        ];
        let live = evaluate(&driver(), &truncated, audit, &config()).unwrap();

        assert_eq!(historical, live);
        assert_eq!(historical.driving_hours_used, dec("3"));
    }

    #[test]
    fn test_cmp_016_partial_hours_are_exact() {
        let intervals = vec![
            reset(),
            DutyInterval::open(DutyStatus::Driving, at(2, 6, 0), "A"),
        ];

        let now = at(2, 6, 0) + Duration::seconds(4500);
        let snapshot = evaluate(&driver(), &intervals, now, &config()).unwrap();
        assert_eq!(snapshot.driving_hours_used, dec("1.25"));
        assert_eq!(snapshot.available_driving_hours, dec("9.75"));
    }
}
