//! In-memory driver ledger.
//!
//! Holds each driver's profile, duty intervals and violation records behind
//! a per-driver mutex. Reads take a consistent copy of a driver's intervals
//! and compute outside the lock; writes hold the lock for the whole
//! read-validate-write sequence, so two status changes for the same driver
//! can never both see the same open interval.

use std::collections::HashMap;
use std::slice;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{
    TransitionOutcome, aggregate_day, evaluate, validate_intervals, validate_transition,
};
use crate::config::HosConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComplianceSnapshot, DailyAggregate, DriverProfile, DutyInterval, DutyStatus, IntervalEnd,
    ViolationCategory, ViolationDescriptor, ViolationRecord,
};

use super::{DutyRepository, ViolationSink};

/// Everything stored for one driver.
#[derive(Debug)]
struct DriverRecord {
    profile: DriverProfile,
    /// Ordered by start time, never overlapping, at most one open.
    intervals: Vec<DutyInterval>,
    violations: Vec<ViolationRecord>,
}

impl DriverRecord {
    /// The instant the next status change may not precede.
    fn latest_boundary(&self) -> Option<DateTime<Utc>> {
        self.intervals
            .iter()
            .map(|i| match i.end {
                IntervalEnd::Open => i.start_time,
                IntervalEnd::Closed(end) => end,
            })
            .max()
    }

    /// Stores a violation unless one with the same category and time exists.
    fn push_violation(&mut self, violation: &ViolationDescriptor, at: DateTime<Utc>) -> bool {
        let category = violation.kind.category();
        let duplicate = self
            .violations
            .iter()
            .any(|v| v.category == category && v.violation_time == at);
        if duplicate {
            return false;
        }

        self.violations.push(ViolationRecord::new(
            self.profile.id.clone(),
            category,
            at,
            violation.message.clone(),
        ));
        true
    }

    fn has_unresolved(&self, category: ViolationCategory) -> bool {
        self.violations
            .iter()
            .any(|v| v.category == category && !v.is_resolved)
    }
}

/// Returns true if the two intervals share any instant.
///
/// Open intervals extend forever; touching intervals do not overlap.
fn overlaps(a: &DutyInterval, b: &DutyInterval) -> bool {
    let a_before_b_ends = b.end_time().is_none_or(|end| a.start_time < end);
    let b_before_a_ends = a.end_time().is_none_or(|end| b.start_time < end);
    a_before_b_ends && b_before_a_ends
}

/// Thread-safe, cloneable store of drivers and their logs.
///
/// # Example
///
/// ```
/// use hos_engine::config::HosConfig;
/// use hos_engine::models::{DriverProfile, DutyStatus, HosRuleType};
/// use hos_engine::store::DriverLedger;
/// use chrono::{TimeZone, Utc};
///
/// let ledger = DriverLedger::new();
/// ledger
///     .register_driver(DriverProfile::new("DRV-001", HosRuleType::SeventyEight))
///     .unwrap();
///
/// let config = HosConfig::default();
/// let at = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
/// ledger
///     .record_status_change("DRV-001", DutyStatus::OnDutyNotDriving, at(6), "Yard", &config)
///     .unwrap();
/// let outcome = ledger
///     .record_status_change("DRV-001", DutyStatus::Driving, at(7), "Yard", &config)
///     .unwrap();
///
/// assert!(outcome.valid);
/// assert_eq!(ledger.intervals("DRV-001").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DriverLedger {
    drivers: Arc<RwLock<HashMap<String, Arc<Mutex<DriverRecord>>>>>,
}

impl DriverLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a driver with an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateDriver`] if the id is taken.
    pub fn register_driver(&self, profile: DriverProfile) -> EngineResult<()> {
        let mut drivers = self.drivers.write();
        if drivers.contains_key(&profile.id) {
            return Err(EngineError::DuplicateDriver {
                driver_id: profile.id,
            });
        }

        debug!(driver_id = %profile.id, rule = %profile.hos_rule_type, "Registered driver");
        let id = profile.id.clone();
        drivers.insert(
            id,
            Arc::new(Mutex::new(DriverRecord {
                profile,
                intervals: Vec::new(),
                violations: Vec::new(),
            })),
        );
        Ok(())
    }

    fn record(&self, driver_id: &str) -> EngineResult<Arc<Mutex<DriverRecord>>> {
        self.drivers
            .read()
            .get(driver_id)
            .cloned()
            .ok_or_else(|| EngineError::DriverNotFound {
                driver_id: driver_id.to_string(),
            })
    }

    /// Returns a copy of the driver's profile.
    pub fn profile(&self, driver_id: &str) -> EngineResult<DriverProfile> {
        Ok(self.record(driver_id)?.lock().profile.clone())
    }

    /// Returns a copy of the driver's whole log, ordered by start time.
    pub fn intervals(&self, driver_id: &str) -> EngineResult<Vec<DutyInterval>> {
        Ok(self.record(driver_id)?.lock().intervals.clone())
    }

    /// Returns the intervals that started at or before `instant`.
    pub fn intervals_up_to(
        &self,
        driver_id: &str,
        instant: DateTime<Utc>,
    ) -> EngineResult<Vec<DutyInterval>> {
        let record = self.record(driver_id)?;
        let record = record.lock();
        Ok(record
            .intervals
            .iter()
            .take_while(|i| i.start_time <= instant)
            .cloned()
            .collect())
    }

    /// Returns a copy of the driver's violation records.
    pub fn violations(&self, driver_id: &str) -> EngineResult<Vec<ViolationRecord>> {
        Ok(self.record(driver_id)?.lock().violations.clone())
    }

    /// Inserts a backfilled interval.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInterval`] if the interval ends before it starts
    /// - [`EngineError::OverlappingInterval`] if it shares time with a stored
    ///   interval (an open interval runs forever)
    pub fn append_interval(&self, driver_id: &str, interval: DutyInterval) -> EngineResult<()> {
        validate_intervals(slice::from_ref(&interval))?;

        let record = self.record(driver_id)?;
        let mut record = record.lock();

        if let Some(existing) = record.intervals.iter().find(|i| overlaps(i, &interval)) {
            return Err(EngineError::OverlappingInterval {
                driver_id: driver_id.to_string(),
                message: format!(
                    "{} interval starting at {} overlaps {} interval starting at {}",
                    interval.status, interval.start_time, existing.status, existing.start_time
                ),
            });
        }

        let position = record
            .intervals
            .partition_point(|i| i.start_time <= interval.start_time);
        record.intervals.insert(position, interval);
        Ok(())
    }

    /// Records a change of duty status at `at`.
    ///
    /// Validates the change against the log as it stands, stores any
    /// violations, then closes the open interval at `at` and opens a new one.
    /// The change is recorded even when violations are produced.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DriverNotFound`] for an unknown driver
    /// - [`EngineError::OverlappingInterval`] if `at` precedes the start of the
    ///   open interval or the end of the latest closed one
    pub fn record_status_change(
        &self,
        driver_id: &str,
        status: DutyStatus,
        at: DateTime<Utc>,
        location: impl Into<String>,
        config: &HosConfig,
    ) -> EngineResult<TransitionOutcome> {
        let correlation_id = Uuid::new_v4();
        let record = self.record(driver_id)?;
        let mut record = record.lock();

        if let Some(boundary) = record.latest_boundary() {
            if at < boundary {
                return Err(EngineError::OverlappingInterval {
                    driver_id: driver_id.to_string(),
                    message: format!("status change at {} precedes {}", at, boundary),
                });
            }
        }

        let outcome =
            validate_transition(&record.profile, &record.intervals, status, at, config)?;
        for violation in &outcome.violations {
            record.push_violation(violation, at);
        }

        if let Some(open) = record.intervals.iter_mut().find(|i| i.is_open()) {
            open.end = IntervalEnd::Closed(at);
        }
        record
            .intervals
            .push(DutyInterval::open(status, at, location));

        info!(
            correlation_id = %correlation_id,
            driver_id = %driver_id,
            status = %status,
            at = %at,
            violations = outcome.violations.len(),
            "Recorded duty status change"
        );

        Ok(outcome)
    }

    /// Evaluates the driver at `now` against the log up to `now`.
    pub fn evaluate(
        &self,
        driver_id: &str,
        now: DateTime<Utc>,
        config: &HosConfig,
    ) -> EngineResult<ComplianceSnapshot> {
        let (profile, intervals) = {
            let record = self.record(driver_id)?;
            let record = record.lock();
            let intervals: Vec<DutyInterval> = record
                .intervals
                .iter()
                .take_while(|i| i.start_time <= now)
                .cloned()
                .collect();
            (record.profile.clone(), intervals)
        };
        evaluate(&profile, &intervals, now, config)
    }

    /// Builds the daily log figures for `day`.
    pub fn aggregate_day(
        &self,
        driver_id: &str,
        day: NaiveDate,
        config: &HosConfig,
    ) -> EngineResult<DailyAggregate> {
        let (profile, intervals) = {
            let record = self.record(driver_id)?;
            let record = record.lock();
            (record.profile.clone(), record.intervals.clone())
        };
        aggregate_day(&profile, &intervals, day, config)
    }
}

impl DutyRepository for DriverLedger {
    fn driver_ids(&self) -> EngineResult<Vec<String>> {
        let mut ids: Vec<String> = self.drivers.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn profile(&self, driver_id: &str) -> EngineResult<DriverProfile> {
        DriverLedger::profile(self, driver_id)
    }

    fn intervals_up_to(
        &self,
        driver_id: &str,
        instant: DateTime<Utc>,
    ) -> EngineResult<Vec<DutyInterval>> {
        DriverLedger::intervals_up_to(self, driver_id, instant)
    }

    fn update_cycle_hours(&self, driver_id: &str, hours: Decimal) -> EngineResult<()> {
        self.record(driver_id)?.lock().profile.current_cycle_hours = hours;
        Ok(())
    }
}

impl ViolationSink for DriverLedger {
    fn record_violation(
        &self,
        driver_id: &str,
        violation: &ViolationDescriptor,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        self.record(driver_id)?.lock().push_violation(violation, at);
        Ok(())
    }

    fn record_if_unresolved(
        &self,
        driver_id: &str,
        violation: &ViolationDescriptor,
        at: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let record = self.record(driver_id)?;
        let mut record = record.lock();
        if record.has_unresolved(violation.kind.category()) {
            return Ok(false);
        }
        Ok(record.push_violation(violation, at))
    }

    fn resolve_violations(
        &self,
        driver_id: &str,
        category: ViolationCategory,
        at: DateTime<Utc>,
    ) -> EngineResult<usize> {
        let record = self.record(driver_id)?;
        let mut record = record.lock();
        let mut resolved = 0;
        for violation in record
            .violations
            .iter_mut()
            .filter(|v| v.category == category && !v.is_resolved)
        {
            violation.resolve(at);
            resolved += 1;
        }
        Ok(resolved)
    }
}
