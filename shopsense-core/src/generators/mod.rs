//! Sample Generators
//!
//! ## Overview
//!
//! Each generator maps `(template, timestamp, previous sample, active anomaly)`
//! to the next sample. They are pure apart from the injected random source, so
//! a seeded RNG reproduces a history exactly.
//!
//! ## Normal Behaviour
//!
//! Without an anomaly every generator performs a small random step from the
//! previous reading, modulated by the time of day:
//!
//! - **Climate**: bounded walk of temperature, humidity and CO2, with CO2
//!   rising around noon while the shop is open
//! - **Energy**: bounded walk of voltage and current, with larger current
//!   swings under business-hours load
//! - **Fill level**: stock depletes (distance grows) and is occasionally
//!   refilled while the shop is open
//! - **Door**: two-state open/closed process, mostly closed at night
//!
//! ## Anomalous Behaviour
//!
//! With an anomaly, the previous reading is pushed through the anomaly's
//! transform instead and the normal clamps are bypassed. Fill levels are the
//! one exception: they are always kept inside `[minDistance, maxDistance]`.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rand::{rngs::StdRng, SeedableRng};
//! use shopsense_core::generators::SampleGenerator;
//! use shopsense_core::templates::{Template, CLIMATE_TEMPLATES};
//!
//! let Template::Climate(template) = CLIMATE_TEMPLATES[0].template else { unreachable!() };
//! let noon = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let first = template.next_sample(noon, None, None, &mut rng);
//! let second = template.next_sample(noon, Some(&first), None, &mut rng);
//! assert!(template.temperature_band().contains(second.temperature));
//! ```

mod climate;
mod door;
mod energy;
mod fill;

use chrono::NaiveDateTime;
use log::warn;
use rand::Rng;

use crate::anomaly::Anomaly;
use crate::samples::Sample;
use crate::templates::Template;

/// A template that can produce the next sample of its sensor
pub trait SampleGenerator {
    /// Sample shape produced
    type Sample;

    /// Fault catalog understood by this generator
    type Anomaly;

    /// Produce the sample at `at` following `previous`
    fn next_sample<R: Rng + ?Sized>(
        &self,
        at: NaiveDateTime,
        previous: Option<&Self::Sample>,
        anomaly: Option<&Self::Anomaly>,
        rng: &mut R,
    ) -> Self::Sample;
}

impl Template {
    /// Dispatch to the generator for this template's shape
    ///
    /// A previous sample or anomaly of a different shape is ignored, as if
    /// the sensor were starting fresh.
    pub fn next_sample<R: Rng + ?Sized>(
        &self,
        at: NaiveDateTime,
        previous: Option<&Sample>,
        anomaly: Option<&Anomaly>,
        rng: &mut R,
    ) -> Sample {
        match self {
            Template::Climate(t) => t
                .next_sample(
                    at,
                    matching(previous, Sample::as_climate),
                    matching(anomaly, Anomaly::as_climate),
                    rng,
                )
                .into(),
            Template::Energy(t) => t
                .next_sample(
                    at,
                    matching(previous, Sample::as_energy),
                    matching(anomaly, Anomaly::as_energy),
                    rng,
                )
                .into(),
            Template::Fill(t) => t
                .next_sample(
                    at,
                    matching(previous, Sample::as_distance),
                    matching(anomaly, Anomaly::as_fill),
                    rng,
                )
                .into(),
            Template::Door(t) => t
                .next_sample(
                    at,
                    matching(previous, Sample::as_distance),
                    matching(anomaly, Anomaly::as_door),
                    rng,
                )
                .into(),
        }
    }
}

fn matching<'a, T: std::fmt::Debug, U>(value: Option<&'a T>, project: impl Fn(&'a T) -> Option<&'a U>) -> Option<&'a U> {
    let value = value?;
    let projected = project(value);
    if projected.is_none() {
        warn!("ignoring {:?}: shape does not match the sensor template", value);
    }
    projected
}
