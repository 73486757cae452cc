//! Configuration types for HOS evaluation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Maximum driving hours after a qualifying off-duty period (49 CFR 395.3(a)(3)).
pub const MAX_DRIVING_HOURS: Decimal = Decimal::from_parts(11, 0, 0, false, 0);

/// Length of the duty window that opens after a qualifying off-duty period.
pub const MAX_DUTY_HOURS_14_WINDOW: Decimal = Decimal::from_parts(14, 0, 0, false, 0);

/// Weekly cap under the 70-hour/8-day rule.
pub const MAX_HOURS_70_8_DAY: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

/// Weekly cap under the 60-hour/7-day rule.
pub const MAX_HOURS_60_7_DAY: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Consecutive off-duty hours that open a new duty window.
pub const MIN_OFF_DUTY_HOURS: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Minimum non-driving gap that satisfies the rest break rule.
pub const MIN_REST_BREAK_MINUTES: u32 = 30;

/// Cumulative driving hours after which a rest break is owed.
pub const REST_BREAK_AFTER_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Default period of the background compliance sweep.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 300;

/// Metadata about the rule set.
///
/// Identifies which regulation the limits were taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesetMetadata {
    /// Short code for the rule set (e.g., "FMCSA-395-PROPERTY").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version or effective date of the rules.
    pub version: String,
    /// URL to the official regulation text.
    pub source_url: String,
}

/// The numeric limits every engine operation is evaluated against.
///
/// Passed explicitly into each operation; there is no process-wide copy.
/// Missing fields in a YAML file fall back to the regulatory defaults.
///
/// # Example
///
/// ```
/// use hos_engine::config::HosConfig;
/// use rust_decimal::Decimal;
///
/// let config = HosConfig::default();
/// assert_eq!(config.max_driving_hours, Decimal::from(11));
/// assert_eq!(config.min_rest_break_minutes, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HosConfig {
    /// Driving cap inside one duty window.
    pub max_driving_hours: Decimal,
    /// Length of the duty window.
    pub max_duty_window_hours: Decimal,
    /// Weekly cap for the 70/8 rule.
    pub max_hours_70_8_day: Decimal,
    /// Weekly cap for the 60/7 rule.
    pub max_hours_60_7_day: Decimal,
    /// Off-duty hours that reset the window.
    pub min_off_duty_hours: Decimal,
    /// Gap length that counts as a rest break.
    pub min_rest_break_minutes: u32,
    /// Driving hours after which a break is owed.
    pub rest_break_after_hours: Decimal,
}

impl Default for HosConfig {
    fn default() -> Self {
        Self {
            max_driving_hours: MAX_DRIVING_HOURS,
            max_duty_window_hours: MAX_DUTY_HOURS_14_WINDOW,
            max_hours_70_8_day: MAX_HOURS_70_8_DAY,
            max_hours_60_7_day: MAX_HOURS_60_7_DAY,
            min_off_duty_hours: MIN_OFF_DUTY_HOURS,
            min_rest_break_minutes: MIN_REST_BREAK_MINUTES,
            rest_break_after_hours: REST_BREAK_AFTER_HOURS,
        }
    }
}

impl HosConfig {
    /// Checks that every limit is positive and that the limits nest.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        let positive = [
            ("max_driving_hours", self.max_driving_hours),
            ("max_duty_window_hours", self.max_duty_window_hours),
            ("max_hours_70_8_day", self.max_hours_70_8_day),
            ("max_hours_60_7_day", self.max_hours_60_7_day),
            ("min_off_duty_hours", self.min_off_duty_hours),
            ("rest_break_after_hours", self.rest_break_after_hours),
        ];

        for (field, value) in positive {
            if value <= Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    field: field.to_string(),
                    message: format!("must be positive, got {}", value),
                });
            }
        }

        if self.min_rest_break_minutes == 0 {
            return Err(EngineError::InvalidConfig {
                field: "min_rest_break_minutes".to_string(),
                message: "must be positive, got 0".to_string(),
            });
        }

        if self.max_driving_hours > self.max_duty_window_hours {
            return Err(EngineError::InvalidConfig {
                field: "max_driving_hours".to_string(),
                message: format!(
                    "{} exceeds the {} hour duty window",
                    self.max_driving_hours, self.max_duty_window_hours
                ),
            });
        }

        if self.rest_break_after_hours > self.max_driving_hours {
            return Err(EngineError::InvalidConfig {
                field: "rest_break_after_hours".to_string(),
                message: format!(
                    "{} exceeds the {} hour driving limit",
                    self.rest_break_after_hours, self.max_driving_hours
                ),
            });
        }

        Ok(())
    }

    /// The rest break threshold as a chrono duration.
    pub fn min_rest_break(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.min_rest_break_minutes))
    }
}

/// Settings for the background compliance sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Seconds between sweep passes.
    pub interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
        }
    }
}

impl SweepConfig {
    /// Rejects a zero interval.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for `interval_seconds: 0`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.interval_seconds == 0 {
            return Err(EngineError::InvalidConfig {
                field: "interval_seconds".to_string(),
                message: "must be positive, got 0".to_string(),
            });
        }
        Ok(())
    }

    /// The sweep period as a std duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// The complete rule set loaded from YAML files.
#[derive(Debug, Clone)]
pub struct RulesetConfig {
    /// Rule set metadata.
    metadata: RulesetMetadata,
    /// Numeric limits.
    limits: HosConfig,
    /// Sweep settings.
    sweep: SweepConfig,
}

impl RulesetConfig {
    /// Creates a new RulesetConfig from its component parts.
    pub fn new(metadata: RulesetMetadata, limits: HosConfig, sweep: SweepConfig) -> Self {
        Self {
            metadata,
            limits,
            sweep,
        }
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &RulesetMetadata {
        &self.metadata
    }

    /// Returns the numeric limits.
    pub fn limits(&self) -> &HosConfig {
        &self.limits
    }

    /// Returns the sweep settings.
    pub fn sweep(&self) -> &SweepConfig {
        &self.sweep
    }
}
