//! Duty status and duty interval types.
//!
//! A driver's timeline is a sequence of [`DutyInterval`]s, each carrying one
//! [`DutyStatus`]. The most recent interval is usually still open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The category of a time interval in a driver's timeline.
///
/// Any status may follow any other; only a change to [`DutyStatus::Driving`]
/// is checked for compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    /// Off duty.
    OffDuty,
    /// Resting in the sleeper berth.
    SleeperBerth,
    /// Behind the wheel.
    Driving,
    /// Working but not driving (loading, inspections, fuelling).
    OnDutyNotDriving,
}

impl DutyStatus {
    /// All four statuses in log-sheet order.
    pub const ALL: [DutyStatus; 4] = [
        DutyStatus::OffDuty,
        DutyStatus::SleeperBerth,
        DutyStatus::Driving,
        DutyStatus::OnDutyNotDriving,
    ];

    /// Returns true for every status that counts toward the weekly limit.
    ///
    /// Sleeper berth time counts; only off-duty time is excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use hos_engine::models::DutyStatus;
    ///
    /// assert!(!DutyStatus::OffDuty.is_on_duty());
    /// assert!(DutyStatus::SleeperBerth.is_on_duty());
    /// assert!(DutyStatus::Driving.is_on_duty());
    /// ```
    pub fn is_on_duty(self) -> bool {
        self != DutyStatus::OffDuty
    }
}

impl std::fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DutyStatus::OffDuty => write!(f, "Off Duty"),
            DutyStatus::SleeperBerth => write!(f, "Sleeper Berth"),
            DutyStatus::Driving => write!(f, "Driving"),
            DutyStatus::OnDutyNotDriving => write!(f, "On Duty (Not Driving)"),
        }
    }
}

/// How a duty interval ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalEnd {
    /// Still in progress; ends at whatever instant it is evaluated at.
    #[default]
    Open,
    /// Ended at the given instant.
    Closed(DateTime<Utc>),
}

/// A single duty-status interval in a driver's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyInterval {
    /// The duty status held during the interval.
    pub status: DutyStatus,
    /// When the status began.
    pub start_time: DateTime<Utc>,
    /// When the status ended, if it has.
    #[serde(default)]
    pub end: IntervalEnd,
    /// Where the status change was recorded.
    #[serde(default)]
    pub location: String,
    /// Free-form remarks from the log sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl DutyInterval {
    /// Creates a closed interval.
    pub fn closed(
        status: DutyStatus,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            status,
            start_time,
            end: IntervalEnd::Closed(end_time),
            location: location.into(),
            remarks: None,
        }
    }

    /// Creates an interval that is still in progress.
    pub fn open(status: DutyStatus, start_time: DateTime<Utc>, location: impl Into<String>) -> Self {
        Self {
            status,
            start_time,
            end: IntervalEnd::Open,
            location: location.into(),
            remarks: None,
        }
    }

    /// Returns true if the interval has no end yet.
    pub fn is_open(&self) -> bool {
        matches!(self.end, IntervalEnd::Open)
    }

    /// Returns the recorded end time, if any.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        match self.end {
            IntervalEnd::Open => None,
            IntervalEnd::Closed(end) => Some(end),
        }
    }

    /// Returns the end time, substituting `fallback` for an open interval.
    pub fn end_or(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.end_time().unwrap_or(fallback)
    }

    /// Returns the effective end as seen from `cutoff`.
    ///
    /// Open intervals end at `cutoff`; closed intervals that end after
    /// `cutoff` are cut back to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use hos_engine::models::{DutyInterval, DutyStatus};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap();
    /// let cutoff = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
    ///
    /// let interval = DutyInterval::closed(DutyStatus::Driving, start, end, "Reno, NV");
    /// assert_eq!(interval.clipped_end(cutoff), cutoff);
    ///
    /// let open = DutyInterval::open(DutyStatus::Driving, start, "Reno, NV");
    /// assert_eq!(open.clipped_end(cutoff), cutoff);
    /// ```
    pub fn clipped_end(&self, cutoff: DateTime<Utc>) -> DateTime<Utc> {
        match self.end {
            IntervalEnd::Open => cutoff,
            IntervalEnd::Closed(end) => end.min(cutoff),
        }
    }

    /// Attaches remarks to the interval.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}
