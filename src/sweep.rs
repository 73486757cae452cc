//! Periodic compliance sweep.
//!
//! Re-evaluates every driver on a fixed interval, refreshes the cached cycle
//! hours on each profile and keeps driving-limit violations in step with the
//! current snapshot. Each driver is checked in its own blocking task; a
//! failure or panic for one driver is logged and reported without stopping
//! the rest of the pass.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::calculation::evaluate;
use crate::clock::Clock;
use crate::config::{HosConfig, SweepConfig};
use crate::error::EngineResult;
use crate::models::{ViolationCategory, ViolationDescriptor, ViolationKind};
use crate::store::{DutyRepository, ViolationSink};

/// Description stored on violations raised by the sweep.
pub const SWEEP_VIOLATION_MESSAGE: &str = "Driver exceeded driving limits";

/// A driver the sweep could not check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    /// The driver whose check failed.
    pub driver_id: String,
    /// The error or panic message.
    pub message: String,
}

/// Summary of one sweep pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Correlation id for the pass, also attached to its log events.
    pub run_id: Uuid,
    /// The instant every driver was evaluated at.
    pub started_at: DateTime<Utc>,
    /// Drivers checked successfully.
    pub drivers_checked: usize,
    /// New violation records created.
    pub violations_found: usize,
    /// Violation records marked resolved.
    pub violations_resolved: usize,
    /// Drivers that could not be checked.
    pub failures: Vec<SweepFailure>,
}

#[derive(Debug, Default)]
struct DriverCheck {
    recorded: bool,
    resolved: usize,
}

/// Checks one driver at `now`.
fn check_driver<S>(
    store: &S,
    driver_id: &str,
    now: DateTime<Utc>,
    config: &HosConfig,
) -> EngineResult<DriverCheck>
where
    S: DutyRepository + ViolationSink + ?Sized,
{
    let profile = store.profile(driver_id)?;
    let intervals = store.intervals_up_to(driver_id, now)?;
    let snapshot = evaluate(&profile, &intervals, now, config)?;

    store.update_cycle_hours(driver_id, snapshot.weekly_hours_used)?;

    if !snapshot.can_drive && snapshot.driving_hours_used > Decimal::ZERO {
        let violation = ViolationDescriptor {
            kind: ViolationKind::DrivingNotAllowed,
            message: SWEEP_VIOLATION_MESSAGE.to_string(),
            snapshot,
        };
        let recorded = store.record_if_unresolved(driver_id, &violation, now)?;
        return Ok(DriverCheck {
            recorded,
            resolved: 0,
        });
    }

    let resolved = if snapshot.can_drive {
        store.resolve_violations(driver_id, ViolationCategory::DrivingLimit, now)?
    } else {
        0
    };

    Ok(DriverCheck {
        recorded: false,
        resolved,
    })
}

/// Background job that re-evaluates every driver on a fixed interval.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use hos_engine::clock::FixedClock;
/// use hos_engine::config::{HosConfig, SweepConfig};
/// use hos_engine::models::{DriverProfile, HosRuleType};
/// use hos_engine::store::DriverLedger;
/// use hos_engine::sweep::ComplianceSweep;
/// use chrono::{TimeZone, Utc};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let ledger = Arc::new(DriverLedger::new());
/// ledger
///     .register_driver(DriverProfile::new("DRV-001", HosRuleType::SeventyEight))
///     .unwrap();
/// let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()));
///
/// let sweep = ComplianceSweep::new(ledger, clock, HosConfig::default(), &SweepConfig::default())
///     .unwrap();
/// let report = runtime.block_on(sweep.run_once()).unwrap();
/// assert_eq!(report.drivers_checked, 1);
/// assert!(report.failures.is_empty());
/// ```
#[derive(Debug)]
pub struct ComplianceSweep<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    config: HosConfig,
    interval: Duration,
}

impl<S, C> ComplianceSweep<S, C>
where
    S: DutyRepository + ViolationSink + 'static,
    C: Clock + 'static,
{
    /// Creates a sweep over `store` using `clock` for the evaluation instant.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`](crate::error::EngineError::InvalidConfig)
    /// if the sweep interval is zero.
    pub fn new(
        store: Arc<S>,
        clock: Arc<C>,
        config: HosConfig,
        sweep: &SweepConfig,
    ) -> EngineResult<Self> {
        sweep.validate()?;
        Ok(Self {
            store,
            clock,
            config,
            interval: sweep.interval(),
        })
    }

    /// The period between passes.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs a single pass over every driver.
    ///
    /// # Errors
    ///
    /// Only a failure to list drivers is returned; per-driver failures are
    /// collected in [`SweepReport::failures`].
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> EngineResult<SweepReport> {
        let run_id = Uuid::new_v4();
        let now = self.clock.now();
        let driver_ids = self.store.driver_ids()?;

        let tasks: Vec<_> = driver_ids
            .into_iter()
            .map(|driver_id| {
                let store = Arc::clone(&self.store);
                let config = self.config.clone();
                let id = driver_id.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    check_driver(store.as_ref(), &id, now, &config)
                });
                (driver_id, handle)
            })
            .collect();

        let mut report = SweepReport {
            run_id,
            started_at: now,
            drivers_checked: 0,
            violations_found: 0,
            violations_resolved: 0,
            failures: Vec::new(),
        };

        for (driver_id, handle) in tasks {
            let message = match handle.await {
                Ok(Ok(check)) => {
                    report.drivers_checked += 1;
                    if check.recorded {
                        report.violations_found += 1;
                    }
                    report.violations_resolved += check.resolved;
                    continue;
                }
                Ok(Err(error)) => error.to_string(),
                Err(join_error) if join_error.is_panic() => "driver check panicked".to_string(),
                Err(join_error) => join_error.to_string(),
            };

            warn!(
                correlation_id = %run_id,
                driver_id = %driver_id,
                error = %message,
                "Compliance check failed for driver"
            );
            report.failures.push(SweepFailure { driver_id, message });
        }

        info!(
            correlation_id = %run_id,
            drivers_checked = report.drivers_checked,
            violations_found = report.violations_found,
            violations_resolved = report.violations_resolved,
            failures = report.failures.len(),
            "Compliance sweep pass complete"
        );

        Ok(report)
    }

    /// Runs passes on the configured interval until `shutdown` completes.
    ///
    /// The first pass starts immediately. Returns the number of passes run.
    pub async fn run<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(interval = ?self.interval, "Compliance sweep started");
        let mut passes = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(error) = self.run_once().await {
                        warn!(error = %error, "Compliance sweep pass failed");
                    }
                    passes += 1;
                }
            }
        }
        info!(passes, "Compliance sweep stopped");
        passes
    }
}
