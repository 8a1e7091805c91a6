//! Common test utilities for integration tests
//!
//! Provides:
//! - Fixed instants and clocks
//! - Seeded random sources
//! - Catalog template fixtures
//! - Sensor builders for rebasing scenarios

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{rngs::StdRng, SeedableRng};

use shopsense_core::{
    templates::{lookup, ClimateTemplate, Template},
    FixedClock, HistoryWalker, Sensor, SensorId, WalkerConfig,
};

/// Monday 2024-06-03 at `hour:min`, inside a normal trading week
pub fn monday(hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 3)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .expect("valid fixture date")
}

pub fn clock_at(hour: u32, min: u32) -> FixedClock {
    FixedClock::new(monday(hour, min))
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Catalog template by key
pub fn template(key: &str) -> Template {
    lookup(key).map(|entry| entry.template).expect("catalog key")
}

pub fn climate(key: &str) -> ClimateTemplate {
    match template(key) {
        Template::Climate(t) => t,
        other => panic!("{key} is not a climate template: {other:?}"),
    }
}

/// Walker that never starts a fault on its own
pub fn quiet_walker() -> HistoryWalker {
    HistoryWalker::new(WalkerConfig { anomaly_probability: 0.0, ..WalkerConfig::default() })
}

/// Sensor with a generated history over `[start, start + length)`
pub fn walked_sensor(id: u64, key: &str, start: NaiveDateTime, length: Duration, seed: u64) -> Sensor {
    let template = template(key);
    let outcome = quiet_walker()
        .walk(&template, start, start + length, &mut seeded(seed))
        .expect("walk fixture");
    Sensor::new(SensorId::Numeric(id), template, outcome.history).expect("non-empty fixture history")
}
