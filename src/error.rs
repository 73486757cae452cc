//! Error types for the HOS compliance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while evaluating a driver's log.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// The main error type for the HOS compliance engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hos_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/limits.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/limits.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was out of range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A duty interval was malformed (e.g. it ends before it starts).
    #[error("Invalid duty interval starting at {start_time}: {message}")]
    InvalidInterval {
        /// Start of the offending interval.
        start_time: DateTime<Utc>,
        /// A description of what made the interval invalid.
        message: String,
    },

    /// The evaluation instant is earlier than an interval in the log.
    #[error("Clock skew: interval starts at {start_time}, after evaluation instant {now}")]
    ClockSkew {
        /// Start of the interval that lies in the future.
        start_time: DateTime<Utc>,
        /// The evaluation instant supplied by the caller.
        now: DateTime<Utc>,
    },

    /// The driver is not known to the ledger.
    #[error("Driver not found: {driver_id}")]
    DriverNotFound {
        /// The requested driver id.
        driver_id: String,
    },

    /// A driver with the same id is already registered.
    #[error("Driver already registered: {driver_id}")]
    DuplicateDriver {
        /// The conflicting driver id.
        driver_id: String,
    },

    /// A write would leave the driver's log with overlapping intervals.
    #[error("Overlapping interval for driver '{driver_id}': {message}")]
    OverlappingInterval {
        /// The driver whose log was being written.
        driver_id: String,
        /// A description of the conflict.
        message: String,
    },

    /// A date range was empty or reversed.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// First day of the range.
        from: NaiveDate,
        /// Last day of the range.
        to: NaiveDate,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
