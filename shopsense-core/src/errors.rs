//! Error Types for Simulation Failures
//!
//! ## Design Philosophy
//!
//! ShopSense generates fixture data offline, so a failed run is simply rerun.
//! Errors therefore carry just enough context for an operator to see what was
//! wrong with the input and fix it:
//!
//! 1. **Parameter problems**: a template whose tolerances or bounds make the
//!    random walk meaningless (`InvalidParameter`).
//! 2. **Range problems**: a walk asked to end before it starts (`InvalidRange`).
//! 3. **Dataset problems**: a rebase over data that has no time extent
//!    (`NoSensors`, `EmptyHistory`, `ZeroTimespan`).
//! 4. **Format problems**: a timestamp that is not ISO-8601 local time
//!    (`InvalidTimestamp`).
//!
//! Unknown anomaly categories are deliberately *not* an error: the anomaly
//! catalog answers `None` and callers carry on without a fault.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use shopsense_core::{SimulationError, rebase::rebase};
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! match rebase(&mut [], now) {
//!     Ok(_) => {}
//!     Err(SimulationError::NoSensors) => {
//!         // Nothing to shift - leave the file alone
//!     }
//!     Err(_) => {
//!         // Report and exit without writing
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Simulation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A template parameter makes generation meaningless
    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter {
        /// Persisted (camelCase) name of the offending parameter
        field: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// Walk end lies before its start
    #[error("Invalid range: end {end} precedes start {start}")]
    InvalidRange {
        /// Requested start, formatted
        start: String,
        /// Requested end, formatted
        end: String,
    },

    /// Dataset contains no sensors
    #[error("Dataset contains no sensors")]
    NoSensors,

    /// A sensor has no history entries to rebase or take a current sample from
    #[error("Sensor {sensor} has an empty history")]
    EmptyHistory {
        /// Display form of the sensor id
        sensor: String,
    },

    /// Oldest and newest timestamps coincide, so progress is undefined
    #[error("Timespan between oldest and newest entry is zero")]
    ZeroTimespan,

    /// Timestamp is not ISO-8601 local time
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = SimulationError::InvalidParameter {
            field: "tempTolerance",
            reason: "must be greater than zero",
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter tempTolerance: must be greater than zero"
        );

        let err = SimulationError::EmptyHistory { sensor: "CLIM_abc".into() };
        assert!(err.to_string().contains("CLIM_abc"));
    }
}
