//! Configuration loading and management for the HOS compliance engine.
//!
//! This module provides the regulatory limits ([`HosConfig`]) every engine
//! operation takes as an explicit argument, and functionality to load a rule
//! set from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use hos_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/fmcsa_property").unwrap();
//! println!("Loaded rule set: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_SWEEP_INTERVAL_SECONDS, HosConfig, MAX_DRIVING_HOURS, MAX_DUTY_HOURS_14_WINDOW,
    MAX_HOURS_60_7_DAY, MAX_HOURS_70_8_DAY, MIN_OFF_DUTY_HOURS, MIN_REST_BREAK_MINUTES,
    REST_BREAK_AFTER_HOURS, RulesetConfig, RulesetMetadata, SweepConfig,
};
