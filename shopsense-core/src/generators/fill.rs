//! Shelf fill-level generator

use chrono::NaiveDateTime;
use rand::Rng;

use super::SampleGenerator;
use crate::anomaly::FillAnomaly;
use crate::constants::sensors::{
    BUSINESS_CONSUMPTION, FILL_START_CONSUMED, IDLE_CONSUMPTION, REFILL_PROBABILITY,
};
use crate::samples::DistanceSample;
use crate::templates::FillTemplate;
use crate::time::is_business_hours;

impl FillTemplate {
    /// Distance of a fresh sensor: 70 % full
    pub fn initial_distance(&self) -> f64 {
        self.max_distance - (self.max_distance - self.min_distance) * (1.0 - FILL_START_CONSUMED)
    }
}

impl SampleGenerator for FillTemplate {
    type Sample = DistanceSample;
    type Anomaly = FillAnomaly;

    fn next_sample<R: Rng + ?Sized>(
        &self,
        at: NaiveDateTime,
        previous: Option<&DistanceSample>,
        anomaly: Option<&FillAnomaly>,
        rng: &mut R,
    ) -> DistanceSample {
        let last = previous.map(|p| p.distance).unwrap_or_else(|| self.initial_distance());

        let distance = match anomaly {
            Some(fault) => fault.apply(last, rng),
            None if is_business_hours(at) => {
                let consumed = rng.gen_range(BUSINESS_CONSUMPTION.0..=BUSINESS_CONSUMPTION.1);
                if rng.gen::<f64>() < REFILL_PROBABILITY {
                    self.max_distance
                } else {
                    last + consumed
                }
            }
            None => last + rng.gen_range(IDLE_CONSUMPTION.0..=IDLE_CONSUMPTION.1),
        };

        // Kept in range even while faulty
        DistanceSample::from_raw(distance.min(self.max_distance).max(self.min_distance))
    }
}
