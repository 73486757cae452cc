//! Daily log aggregation.
//!
//! Reduces a driver's intervals to per-day status totals for log sheets.
//! Aggregates are derived data: recomputing one for an unchanged interval set
//! always yields the same value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::HosConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{DailyAggregate, DriverProfile, DutyInterval, DutyStatus, StatusTotals};

use super::hours::{StatusSelector, rolling_total_as_of, sum_status_hours_for_day};

/// Builds the log sheet figures for one UTC calendar day.
///
/// Status totals count intervals that started during the day, with open
/// intervals running to the end of the day. The weekly figure is the rolling
/// 7 or 8 day on-duty total through the end of the day.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInterval`] if any interval ends before it starts.
///
/// # Example
///
/// ```
/// use hos_engine::calculation::aggregate_day;
/// use hos_engine::config::HosConfig;
/// use hos_engine::models::{DriverProfile, DutyInterval, DutyStatus, HosRuleType};
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
/// let driver = DriverProfile::new("DRV-001", HosRuleType::SeventyEight);
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::OffDuty, at(0), at(6), "Home"),
///     DutyInterval::closed(DutyStatus::OnDutyNotDriving, at(6), at(7), "Yard"),
///     DutyInterval::closed(DutyStatus::Driving, at(7), at(16), "I-80"),
///     DutyInterval::open(DutyStatus::OffDuty, at(16), "Truck stop"),
/// ];
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let aggregate = aggregate_day(&driver, &intervals, day, &HosConfig::default()).unwrap();
///
/// assert_eq!(aggregate.totals.driving, Decimal::from(9));
/// assert_eq!(aggregate.totals.off_duty, Decimal::from(14));
/// assert_eq!(aggregate.weekly_hours, Decimal::from(10));
/// assert_eq!(aggregate.hours_available_tomorrow, Decimal::from(60));
/// ```
pub fn aggregate_day(
    driver: &DriverProfile,
    intervals: &[DutyInterval],
    day: NaiveDate,
    config: &HosConfig,
) -> EngineResult<DailyAggregate> {
    let mut totals = StatusTotals::default();
    for status in DutyStatus::ALL {
        *totals.get_mut(status) =
            sum_status_hours_for_day(intervals, StatusSelector::Only(status), day)?;
    }

    let weekly_hours = rolling_total_as_of(intervals, driver.hos_rule_type, day)?;
    let weekly_cap = driver.hos_rule_type.weekly_cap(config);
    let hours_available_tomorrow = (weekly_cap - weekly_hours).max(Decimal::ZERO);

    debug!(
        driver_id = %driver.id,
        date = %day,
        driving = %totals.driving,
        weekly_hours = %weekly_hours,
        "Aggregated daily log"
    );

    Ok(DailyAggregate {
        driver_id: driver.id.clone(),
        date: day,
        totals,
        weekly_hours,
        weekly_cap,
        hours_available_tomorrow,
    })
}

/// Builds one aggregate per day from `from` through `to` inclusive.
///
/// # Errors
///
/// - [`EngineError::InvalidDateRange`] if `from` is after `to`
/// - [`EngineError::InvalidInterval`] if any interval ends before it starts
pub fn aggregate_range(
    driver: &DriverProfile,
    intervals: &[DutyInterval],
    from: NaiveDate,
    to: NaiveDate,
    config: &HosConfig,
) -> EngineResult<Vec<DailyAggregate>> {
    if from > to {
        return Err(EngineError::InvalidDateRange { from, to });
    }

    from.iter_days()
        .take_while(|day| *day <= to)
        .map(|day| aggregate_day(driver, intervals, day, config))
        .collect()
}
