//! Core data models for the HOS compliance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod daily_log;
mod driver;
mod duty;
mod snapshot;
mod violation;

pub use daily_log::{DailyAggregate, StatusTotals};
pub use driver::{DriverProfile, HosRuleType};
pub use duty::{DutyInterval, DutyStatus, IntervalEnd};
pub use snapshot::ComplianceSnapshot;
pub use violation::{ViolationCategory, ViolationDescriptor, ViolationKind, ViolationRecord};
