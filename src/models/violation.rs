//! Violation descriptors and persisted violation records.
//!
//! The engine produces [`ViolationDescriptor`]s. Persisting them as
//! [`ViolationRecord`]s is the job of a
//! [`ViolationSink`](crate::store::ViolationSink).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ComplianceSnapshot;

/// The kind of violation raised by the transition validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The driver has no driving time left.
    DrivingNotAllowed,
    /// A 30-minute break is owed.
    RestBreakRequired,
    /// The rolling weekly cap is exhausted.
    WeeklyLimitExceeded,
}

impl ViolationKind {
    /// Returns the persisted category for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use hos_engine::models::{ViolationCategory, ViolationKind};
    ///
    /// assert_eq!(
    ///     ViolationKind::DrivingNotAllowed.category(),
    ///     ViolationCategory::DrivingLimit
    /// );
    /// ```
    pub fn category(self) -> ViolationCategory {
        match self {
            ViolationKind::DrivingNotAllowed => ViolationCategory::DrivingLimit,
            ViolationKind::RestBreakRequired => ViolationCategory::RestBreak,
            ViolationKind::WeeklyLimitExceeded => ViolationCategory::WeeklyLimit,
        }
    }

    /// Returns the human-readable message attached to descriptors of this kind.
    pub fn message(self) -> &'static str {
        match self {
            ViolationKind::DrivingNotAllowed => {
                "Driver cannot start driving due to HOS constraints"
            }
            ViolationKind::RestBreakRequired => "30-minute rest break required before driving",
            ViolationKind::WeeklyLimitExceeded => {
                "Rolling weekly on-duty limit reached; driving not permitted"
            }
        }
    }
}

/// Category under which a violation is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// 11-hour driving limit.
    DrivingLimit,
    /// 14-hour duty window.
    DutyLimit,
    /// 70/60-hour weekly limit.
    WeeklyLimit,
    /// 30-minute rest break.
    RestBreak,
    /// 10-hour off-duty requirement.
    OffDuty,
}

impl std::fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationCategory::DrivingLimit => write!(f, "11-Hour Driving Limit"),
            ViolationCategory::DutyLimit => write!(f, "14-Hour Duty Limit"),
            ViolationCategory::WeeklyLimit => write!(f, "70/60-Hour Weekly Limit"),
            ViolationCategory::RestBreak => write!(f, "30-Minute Rest Break"),
            ViolationCategory::OffDuty => write!(f, "10-Hour Off Duty"),
        }
    }
}

/// A violation produced by the engine, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationDescriptor {
    /// What was violated.
    pub kind: ViolationKind,
    /// Human-readable explanation.
    pub message: String,
    /// The snapshot that triggered the violation.
    pub snapshot: ComplianceSnapshot,
}

impl ViolationDescriptor {
    /// Builds a descriptor with the standard message for `kind`.
    pub fn new(kind: ViolationKind, snapshot: ComplianceSnapshot) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
            snapshot,
        }
    }
}

/// A violation as persisted by the surrounding system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The driver the violation belongs to.
    pub driver_id: String,
    /// Stored category.
    pub category: ViolationCategory,
    /// When the violation occurred.
    pub violation_time: DateTime<Utc>,
    /// Human-readable description.
    pub description: String,
    /// Whether the condition has since cleared.
    pub is_resolved: bool,
    /// When the condition cleared.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ViolationRecord {
    /// Creates an unresolved record with a fresh id.
    pub fn new(
        driver_id: impl Into<String>,
        category: ViolationCategory,
        violation_time: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver_id: driver_id.into(),
            category,
            violation_time,
            description: description.into(),
            is_resolved: false,
            resolved_at: None,
        }
    }

    /// Marks the record resolved at `at`.
    pub fn resolve(&mut self, at: DateTime<Utc>) {
        self.is_resolved = true;
        self.resolved_at = Some(at);
    }
}
