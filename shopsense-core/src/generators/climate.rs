//! Room climate generator

use chrono::NaiveDateTime;
use rand::Rng;

use super::SampleGenerator;
use crate::anomaly::ClimateAnomaly;
use crate::constants::sensors::{CO2_OCCUPANCY_PPM, CO2_STEP_PPM, HUMIDITY_STEP_PCT, TEMP_STEP_C};
use crate::samples::ClimateSample;
use crate::templates::ClimateTemplate;
use crate::time::{day_factor, is_business_hours};

impl SampleGenerator for ClimateTemplate {
    type Sample = ClimateSample;
    type Anomaly = ClimateAnomaly;

    fn next_sample<R: Rng + ?Sized>(
        &self,
        at: NaiveDateTime,
        previous: Option<&ClimateSample>,
        anomaly: Option<&ClimateAnomaly>,
        rng: &mut R,
    ) -> ClimateSample {
        let (temperature, humidity, co2) = previous
            .map(|p| (p.temperature, p.humidity, p.co2))
            .unwrap_or((self.target_temperature, self.target_humidity, self.target_co2));

        // Steps are drawn even when an anomaly overrides them
        let temp_change = rng.gen_range(-TEMP_STEP_C..=TEMP_STEP_C);
        let humidity_change = rng.gen_range(-HUMIDITY_STEP_PCT..=HUMIDITY_STEP_PCT);
        let mut co2_change = rng.gen_range(-CO2_STEP_PPM..=CO2_STEP_PPM);
        if is_business_hours(at) {
            co2_change += day_factor(at) * CO2_OCCUPANCY_PPM;
        }

        let (temperature, humidity, co2) = match anomaly {
            Some(fault) => fault.apply((temperature, humidity, co2), rng),
            None => (
                self.temperature_band().clamp(temperature + temp_change),
                self.humidity_band().clamp(humidity + humidity_change),
                self.co2_band().clamp(co2 + co2_change),
            ),
        };

        ClimateSample::from_raw(temperature, humidity, co2)
    }
}
