//! Calculation logic for the HOS compliance engine.
//!
//! This module contains every pure engine operation: timeline validation,
//! interval summation, duty window detection, rest break monitoring,
//! compliance evaluation, transition validation and daily log aggregation.
//! None of them perform I/O or read ambient state; the limits are always
//! passed in as a [`HosConfig`](crate::config::HosConfig).

mod compliance;
mod daily_log;
mod hours;
mod rest_break;
mod timeline;
mod transition;
mod window;

pub use compliance::{current_duty_status, evaluate};
pub use daily_log::{aggregate_day, aggregate_range};
pub use hours::{
    StatusSelector, day_bounds, driving_hours_in_window, duration_hours, hours_between,
    rolling_7_day_total, rolling_8_day_total, rolling_total_as_of, sum_status_hours,
    sum_status_hours_for_day, weekly_hours_used,
};
pub use rest_break::is_rest_break_required;
pub use timeline::{Timeline, overlapping_pairs, validate_intervals};
pub use transition::{TransitionOutcome, validate_and_record, validate_transition};
pub use window::{find_window_start, window_hours_remaining};
