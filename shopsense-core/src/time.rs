//! Time management for simulated histories
//!
//! Provides clock abstraction so "now" can come from different sources:
//! - System clock (local wall time, what the generators use by default)
//! - Fixed time (for reproducible tests and rebasing to a known instant)
//!
//! Also holds the persisted [`Timestamp`] form and the diurnal helpers the
//! sample generators share.

use std::fmt;

use chrono::{Local, NaiveDateTime, SubsecRound, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::time::{BUSINESS_HOURS_END, BUSINESS_HOURS_START, MIDDAY_HOUR};
use crate::errors::{SimulationError, SimulationResult};

/// Source of wall-clock time for the system
pub trait Clock {
    /// Current local time
    fn now(&self) -> NaiveDateTime;
}

/// Local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: NaiveDateTime,
}

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self { instant }
    }

    pub fn advance(&mut self, delta: chrono::Duration) {
        self.instant += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant
    }
}

/// Whether `at` falls inside shop opening hours (08:00 to 20:59, inclusive on the hour)
pub fn is_business_hours(at: NaiveDateTime) -> bool {
    (BUSINESS_HOURS_START..=BUSINESS_HOURS_END).contains(&at.hour())
}

/// Diurnal weight in [0, 1], peaking at noon and reaching zero at midnight
pub fn day_factor(at: NaiveDateTime) -> f64 {
    let hour = at.hour() as f64;
    1.0 - (hour - MIDDAY_HOUR).abs() / MIDDAY_HOUR
}

/// Parse format; the fraction is optional
const ISO_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const ISO_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_MICROS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Persisted history timestamp
///
/// Local wall time without offset. Timestamps rewritten by the rebaser carry
/// a literal `Z` suffix; it is cosmetic only and does not mean UTC. The flag
/// is kept so a load/save cycle reproduces the file byte for byte.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    local: NaiveDateTime,
    zulu_suffix: bool,
}

impl Timestamp {
    /// Plain local timestamp, truncated to microseconds
    pub fn local(local: NaiveDateTime) -> Self {
        Self { local: local.trunc_subsecs(6), zulu_suffix: false }
    }

    /// Local timestamp written with a trailing `Z`
    pub fn with_zulu_suffix(local: NaiveDateTime) -> Self {
        Self { local: local.trunc_subsecs(6), zulu_suffix: true }
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS[.ffffff][Z]`, dropping digits past microseconds
    pub fn parse(raw: &str) -> SimulationResult<Self> {
        let (body, zulu_suffix) = match raw.strip_suffix('Z') {
            Some(body) => (body, true),
            None => (raw, false),
        };
        let local = NaiveDateTime::parse_from_str(body, ISO_LOCAL_FORMAT)
            .map_err(|_| SimulationError::InvalidTimestamp(raw.to_string()))?;
        Ok(Self { local: local.trunc_subsecs(6), zulu_suffix })
    }

    /// The local wall time
    pub fn naive(&self) -> NaiveDateTime {
        self.local
    }

    /// Whether this timestamp is written with the trailing `Z`
    pub fn has_zulu_suffix(&self) -> bool {
        self.zulu_suffix
    }
}

// Suffix is presentation only
impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.local == other.local
    }
}

impl Eq for Timestamp {}

impl std::hash::Hash for Timestamp {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.local.hash(state);
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.local.cmp(&other.local)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Six fraction digits or none at all
        let format = if self.local.nanosecond() == 0 {
            ISO_SECONDS_FORMAT
        } else {
            ISO_MICROS_FORMAT
        };
        write!(f, "{}", self.local.format(format))?;
        if self.zulu_suffix {
            f.write_str("Z")?;
        }
        Ok(())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}
