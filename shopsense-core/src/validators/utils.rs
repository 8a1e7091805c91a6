//! Shared parameter checks
//!
//! Small pure helpers so every template and config check reports failures
//! the same way: the offending field plus a short reason.

use crate::errors::{SimulationError, SimulationResult};

fn invalid(field: &'static str, reason: &'static str) -> SimulationError {
    SimulationError::InvalidParameter { field, reason }
}

/// Reject NaN and infinities
pub fn check_finite(field: &'static str, value: f64) -> SimulationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

/// Finite and strictly positive
pub fn check_positive(field: &'static str, value: f64) -> SimulationResult<()> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be greater than zero"))
    }
}

/// Finite and inside `[min, max]`
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> SimulationResult<()> {
    check_finite(field, value)?;
    if value < min || value > max {
        Err(invalid(field, "out of range"))
    } else {
        Ok(())
    }
}

/// Probability in `[0, 1]`
pub fn check_probability(field: &'static str, value: f64) -> SimulationResult<()> {
    check_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be a probability between 0 and 1"))
    }
}

/// `lower < upper`, reported against `field`
pub fn check_ordered(field: &'static str, lower: f64, upper: f64) -> SimulationResult<()> {
    if lower < upper {
        Ok(())
    } else {
        Err(invalid(field, "lower bound must be below upper bound"))
    }
}
