//! Daily log aggregate models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DutyStatus;

/// Hours per duty status for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTotals {
    /// Off-duty hours.
    pub off_duty: Decimal,
    /// Sleeper berth hours.
    pub sleeper_berth: Decimal,
    /// Driving hours.
    pub driving: Decimal,
    /// On-duty, not driving hours.
    pub on_duty_not_driving: Decimal,
}

impl StatusTotals {
    /// Returns the total for one status.
    pub fn get(&self, status: DutyStatus) -> Decimal {
        match status {
            DutyStatus::OffDuty => self.off_duty,
            DutyStatus::SleeperBerth => self.sleeper_berth,
            DutyStatus::Driving => self.driving,
            DutyStatus::OnDutyNotDriving => self.on_duty_not_driving,
        }
    }

    /// Returns a mutable reference to the total for one status.
    pub fn get_mut(&mut self, status: DutyStatus) -> &mut Decimal {
        match status {
            DutyStatus::OffDuty => &mut self.off_duty,
            DutyStatus::SleeperBerth => &mut self.sleeper_berth,
            DutyStatus::Driving => &mut self.driving,
            DutyStatus::OnDutyNotDriving => &mut self.on_duty_not_driving,
        }
    }

    /// Sum across all four statuses.
    pub fn total(&self) -> Decimal {
        self.off_duty + self.sleeper_berth + self.driving + self.on_duty_not_driving
    }
}

/// Per-day reduction of a driver's log, used for log sheets and reports.
///
/// Derived and recomputed on demand; never the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// The driver the day belongs to.
    pub driver_id: String,
    /// The calendar day (UTC).
    pub date: NaiveDate,
    /// Hours per duty status.
    pub totals: StatusTotals,
    /// Rolling on-duty total as of the end of the day.
    pub weekly_hours: Decimal,
    /// The weekly cap for the driver's rule.
    pub weekly_cap: Decimal,
    /// Weekly hours left going into the next day.
    pub hours_available_tomorrow: Decimal,
}
