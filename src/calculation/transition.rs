//! Duty status transition validation.
//!
//! Validation is advisory: it reports what a proposed status change would
//! violate but never prevents the change from being recorded. Only a change
//! to [`DutyStatus::Driving`] is checked.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::HosConfig;
use crate::error::EngineResult;
use crate::models::{
    ComplianceSnapshot, DriverProfile, DutyInterval, DutyStatus, ViolationDescriptor,
    ViolationKind,
};
use crate::store::ViolationSink;

use super::compliance::evaluate;

/// The result of validating a proposed status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// True if no violations were produced.
    pub valid: bool,
    /// Every violation the change would cause.
    pub violations: Vec<ViolationDescriptor>,
    /// The compliance position the check was made against.
    pub snapshot: ComplianceSnapshot,
}

/// Lists the violations a change to `proposed` would cause, given `snapshot`.
fn violations_for(proposed: DutyStatus, snapshot: &ComplianceSnapshot) -> Vec<ViolationDescriptor> {
    if proposed != DutyStatus::Driving {
        return Vec::new();
    }

    let checks = [
        (ViolationKind::DrivingNotAllowed, !snapshot.can_drive),
        (ViolationKind::RestBreakRequired, snapshot.rest_break_required),
        (
            ViolationKind::WeeklyLimitExceeded,
            snapshot.weekly_hours_available <= Decimal::ZERO,
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, fired)| *fired)
        .map(|(kind, _)| ViolationDescriptor::new(kind, snapshot.clone()))
        .collect()
}

/// Validates a proposed change of duty status at `now`.
///
/// For a change to driving:
/// - `DrivingNotAllowed` if the snapshot says the driver cannot drive
/// - `RestBreakRequired` if a rest break is owed
/// - `WeeklyLimitExceeded` if the weekly cap is used up
///
/// Any combination may fire. Other target statuses always validate.
///
/// # Errors
///
/// Returns the timeline validation errors (`InvalidInterval`, `ClockSkew`).
///
/// # Example
///
/// ```
/// use hos_engine::calculation::validate_transition;
/// use hos_engine::config::HosConfig;
/// use hos_engine::models::{DriverProfile, DutyInterval, DutyStatus, HosRuleType, ViolationKind};
/// use chrono::{TimeZone, Utc};
///
/// let at = |d, h| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
/// let driver = DriverProfile::new("DRV-001", HosRuleType::SeventyEight);
/// let intervals = vec![
///     DutyInterval::closed(DutyStatus::OffDuty, at(1, 20), at(2, 6), "Boise, ID"),
///     DutyInterval::closed(DutyStatus::Driving, at(2, 6), at(2, 14), "I-84"),
///     DutyInterval::open(DutyStatus::OnDutyNotDriving, at(2, 14), "Fuel stop"),
/// ];
///
/// let outcome = validate_transition(
///     &driver,
///     &intervals,
///     DutyStatus::Driving,
///     at(2, 14),
///     &HosConfig::default(),
/// )
/// .unwrap();
///
/// assert!(!outcome.valid);
/// let kinds: Vec<_> = outcome.violations.iter().map(|v| v.kind).collect();
/// assert_eq!(kinds, vec![ViolationKind::DrivingNotAllowed, ViolationKind::RestBreakRequired]);
/// ```
pub fn validate_transition(
    driver: &DriverProfile,
    intervals: &[DutyInterval],
    proposed: DutyStatus,
    now: DateTime<Utc>,
    config: &HosConfig,
) -> EngineResult<TransitionOutcome> {
    let snapshot = evaluate(driver, intervals, now, config)?;
    let violations = violations_for(proposed, &snapshot);

    if violations.is_empty() {
        info!(
            driver_id = %driver.id,
            proposed = %proposed,
            "Duty status change validated"
        );
    } else {
        for violation in &violations {
            warn!(
                driver_id = %driver.id,
                proposed = %proposed,
                kind = ?violation.kind,
                "{}",
                violation.message
            );
        }
    }

    Ok(TransitionOutcome {
        valid: violations.is_empty(),
        violations,
        snapshot,
    })
}

/// Validates a proposed change and hands every violation to `sink`.
///
/// Returns the same outcome as [`validate_transition`]. Violations are
/// recorded at `now`.
///
/// # Errors
///
/// Returns the timeline validation errors, or the first error from `sink`.
pub fn validate_and_record(
    driver: &DriverProfile,
    intervals: &[DutyInterval],
    proposed: DutyStatus,
    now: DateTime<Utc>,
    config: &HosConfig,
    sink: &dyn ViolationSink,
) -> EngineResult<TransitionOutcome> {
    let outcome = validate_transition(driver, intervals, proposed, now, config)?;
    for violation in &outcome.violations {
        sink.record_violation(&driver.id, violation, now)?;
    }
    Ok(outcome)
}
