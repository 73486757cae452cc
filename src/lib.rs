//! Hours-of-Service compliance engine for property-carrying drivers
//!
//! This crate evaluates a driver's duty-status log against the FMCSA
//! Hours-of-Service limits (49 CFR Part 395): the 11-hour driving limit, the
//! 14-hour duty window, the 30-minute rest break and the rolling 60/7 and
//! 70/8 weekly caps. Every answer is a pure function of the log, the
//! evaluation instant and the configured limits, so a historical audit gives
//! the same result the live check did.

#![warn(missing_docs)]

pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod sweep;
