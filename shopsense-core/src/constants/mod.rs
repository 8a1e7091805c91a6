//! Constants for ShopSense Core
//!
//! This module provides centralized, documented constants used throughout
//! the simulation. All numeric values that shape a generated history live
//! here so that a reader can see the whole behavioural envelope in one place.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Time**: Sampling intervals, business hours, history lengths
//! - **Sensors**: Random-walk step sizes, event probabilities, anomaly factors
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include units in names (`_MINUTES`, `_PPM`, `_V`)
//! 3. Group related constants together

/// Time-related constants for intervals, opening hours and anomaly windows.
pub mod time;

/// Random-walk step sizes, probabilities and anomaly transform ranges.
pub mod sensors;

// Re-export commonly used constants for convenience
pub use time::{
    DEFAULT_INTERVAL_MINUTES, DOOR_INTERVAL_MINUTES, DEFAULT_HISTORY_DAYS,
    BUSINESS_HOURS_START, BUSINESS_HOURS_END,
};

pub use sensors::{
    ANOMALY_TRIGGER_PROBABILITY, TOLERANCE_BAND_FACTOR,
};
