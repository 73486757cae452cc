//! Data-access contracts and the in-memory driver ledger.
//!
//! The engine itself never fetches or persists anything. The surrounding
//! system supplies driver data through [`DutyRepository`] and takes
//! violations through [`ViolationSink`]. [`DriverLedger`] implements both in
//! memory with per-driver write serialization.

mod ledger;

pub use ledger::DriverLedger;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{DriverProfile, DutyInterval, ViolationCategory, ViolationDescriptor};

/// Read access to drivers and their duty intervals.
pub trait DutyRepository: Send + Sync {
    /// Ids of every driver the sweep should evaluate.
    fn driver_ids(&self) -> EngineResult<Vec<String>>;

    /// The driver's profile.
    fn profile(&self, driver_id: &str) -> EngineResult<DriverProfile>;

    /// The driver's intervals with `start_time <= instant`, ordered by start.
    fn intervals_up_to(
        &self,
        driver_id: &str,
        instant: DateTime<Utc>,
    ) -> EngineResult<Vec<DutyInterval>>;

    /// Stores the driver's latest weekly usage on the profile.
    fn update_cycle_hours(&self, driver_id: &str, hours: Decimal) -> EngineResult<()>;
}

/// Persists violations handed over by the engine.
pub trait ViolationSink: Send + Sync {
    /// Stores a violation that occurred at `at`.
    fn record_violation(
        &self,
        driver_id: &str,
        violation: &ViolationDescriptor,
        at: DateTime<Utc>,
    ) -> EngineResult<()>;

    /// Stores a violation unless the driver already has an unresolved one in
    /// the same category. Returns true if a record was created.
    fn record_if_unresolved(
        &self,
        driver_id: &str,
        violation: &ViolationDescriptor,
        at: DateTime<Utc>,
    ) -> EngineResult<bool>;

    /// Marks the driver's unresolved violations in `category` resolved at `at`.
    /// Returns how many were resolved.
    fn resolve_violations(
        &self,
        driver_id: &str,
        category: ViolationCategory,
        at: DateTime<Utc>,
    ) -> EngineResult<usize>;
}
