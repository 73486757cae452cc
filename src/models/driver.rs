//! Driver profile and weekly rule types.
//!
//! This module defines the [`DriverProfile`] struct and [`HosRuleType`] enum
//! describing which rolling weekly cap a driver operates under.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::HosConfig;

/// The rolling weekly regime a driver is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HosRuleType {
    /// 70 on-duty hours in any 8 consecutive days.
    SeventyEight,
    /// 60 on-duty hours in any 7 consecutive days.
    SixtySeven,
}

impl HosRuleType {
    /// Returns the length of the rolling lookback in days.
    ///
    /// # Examples
    ///
    /// ```
    /// use hos_engine::models::HosRuleType;
    ///
    /// assert_eq!(HosRuleType::SeventyEight.lookback_days(), 8);
    /// assert_eq!(HosRuleType::SixtySeven.lookback_days(), 7);
    /// ```
    pub fn lookback_days(self) -> i64 {
        match self {
            HosRuleType::SeventyEight => 8,
            HosRuleType::SixtySeven => 7,
        }
    }

    /// Returns the weekly on-duty cap in hours for this rule.
    pub fn weekly_cap(self, config: &HosConfig) -> Decimal {
        match self {
            HosRuleType::SeventyEight => config.max_hours_70_8_day,
            HosRuleType::SixtySeven => config.max_hours_60_7_day,
        }
    }
}

impl std::fmt::Display for HosRuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HosRuleType::SeventyEight => write!(f, "70 hours/8 days"),
            HosRuleType::SixtySeven => write!(f, "60 hours/7 days"),
        }
    }
}

/// A driver subject to Hours-of-Service evaluation.
///
/// Owned by the surrounding system; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    /// Unique identifier for the driver.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The weekly regime the driver operates under.
    pub hos_rule_type: HosRuleType,
    /// Last known weekly usage, refreshed by the compliance sweep.
    #[serde(default)]
    pub current_cycle_hours: Decimal,
}

impl DriverProfile {
    /// Creates a profile with zero cached cycle hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use hos_engine::models::{DriverProfile, HosRuleType};
    /// use rust_decimal::Decimal;
    ///
    /// let driver = DriverProfile::new("DRV-001", HosRuleType::SeventyEight);
    /// assert_eq!(driver.current_cycle_hours, Decimal::ZERO);
    /// ```
    pub fn new(id: impl Into<String>, hos_rule_type: HosRuleType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            hos_rule_type,
            current_cycle_hours: Decimal::ZERO,
        }
    }
}
