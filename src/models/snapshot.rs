//! Point-in-time compliance snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DutyStatus;

/// The compliance position of one driver at one instant.
///
/// A pure function of the driver profile, the interval list, the evaluation
/// instant and the configuration. All hour quantities are elapsed seconds
/// divided by 3600, unrounded.
///
/// # Example
///
/// ```
/// use hos_engine::models::{ComplianceSnapshot, DutyStatus};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let snapshot = ComplianceSnapshot {
///     evaluated_at: Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap(),
///     window_start: None,
///     available_driving_hours: Decimal::from(11),
///     window_hours_remaining: Decimal::from(14),
///     driving_hours_used: Decimal::ZERO,
///     weekly_hours_used: Decimal::ZERO,
///     weekly_hours_available: Decimal::from(70),
///     rest_break_required: false,
///     current_duty_status: DutyStatus::OffDuty,
///     can_drive: true,
/// };
/// assert!(snapshot.can_drive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    /// The instant the snapshot was computed for.
    pub evaluated_at: DateTime<Utc>,
    /// End of the qualifying off-duty period that opened the current window.
    pub window_start: Option<DateTime<Utc>>,
    /// Driving hours left, bounded by both the driving limit and the window.
    pub available_driving_hours: Decimal,
    /// Hours left in the 14-hour duty window.
    pub window_hours_remaining: Decimal,
    /// Driving hours used since the window opened.
    pub driving_hours_used: Decimal,
    /// On-duty hours over the rolling 7 or 8 day lookback.
    pub weekly_hours_used: Decimal,
    /// Remaining on-duty hours under the weekly cap.
    pub weekly_hours_available: Decimal,
    /// Whether a 30-minute break is owed before further driving.
    pub rest_break_required: bool,
    /// Status of the open interval at the evaluation instant.
    pub current_duty_status: DutyStatus,
    /// Whether the driver may start or continue driving.
    pub can_drive: bool,
}
