//! Time-Related Constants
//!
//! This module defines sampling intervals, opening hours and anomaly windows
//! used by the generators and the history walker.

// ===== SAMPLING INTERVALS =====

/// Sampling interval for climate, energy and fill-level sensors (minutes).
///
/// Quarter-hour resolution is enough for slow-moving shop conditions.
pub const DEFAULT_INTERVAL_MINUTES: i64 = 15;

/// Sampling interval for door sensors (minutes).
///
/// Doors change state much faster than climate, so they are sampled
/// three times as often.
pub const DOOR_INTERVAL_MINUTES: i64 = 5;

// ===== OPENING HOURS =====

/// First hour counted as business hours (inclusive).
pub const BUSINESS_HOURS_START: u32 = 8;

/// Last hour counted as business hours (inclusive, so 20:59 still counts).
pub const BUSINESS_HOURS_END: u32 = 20;

/// Hour at which the diurnal factor peaks.
pub const MIDDAY_HOUR: f64 = 12.0;

// ===== ANOMALY WINDOWS =====

/// Shortest anomaly window (minutes, inclusive).
pub const ANOMALY_MIN_MINUTES: i64 = 30;

/// Longest anomaly window (minutes, inclusive).
pub const ANOMALY_MAX_MINUTES: i64 = 120;

// ===== HISTORY LENGTH =====

/// Default length of a generated history (days back from now).
pub const DEFAULT_HISTORY_DAYS: i64 = 7;
