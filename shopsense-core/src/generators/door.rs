//! Door opening generator

use chrono::NaiveDateTime;
use rand::Rng;

use super::SampleGenerator;
use crate::anomaly::DoorAnomaly;
use crate::constants::sensors::{DOOR_CLOSE_PROBABILITY, DOOR_NIGHT_CLOSE_PROBABILITY, DOOR_OPEN_PROBABILITY};
use crate::samples::DistanceSample;
use crate::templates::DoorTemplate;
use crate::time::is_business_hours;

impl SampleGenerator for DoorTemplate {
    type Sample = DistanceSample;
    type Anomaly = DoorAnomaly;

    fn next_sample<R: Rng + ?Sized>(
        &self,
        at: NaiveDateTime,
        previous: Option<&DistanceSample>,
        anomaly: Option<&DoorAnomaly>,
        rng: &mut R,
    ) -> DistanceSample {
        let Some(last) = previous.map(|p| p.distance) else {
            return DistanceSample::from_raw(self.target_distance);
        };

        let distance = match anomaly {
            Some(fault) => fault.apply(last, rng),
            None if is_business_hours(at) => {
                let closed = last <= self.target_distance;
                let roll = rng.gen::<f64>();
                match (closed, roll) {
                    (true, r) if r < DOOR_OPEN_PROBABILITY => self.open_distance(),
                    (false, r) if r < DOOR_CLOSE_PROBABILITY => self.target_distance,
                    _ => last,
                }
            }
            None if rng.gen::<f64>() < DOOR_NIGHT_CLOSE_PROBABILITY => self.target_distance,
            None => last,
        };

        DistanceSample::from_raw(distance)
    }
}
