//! Power supply generator

use chrono::NaiveDateTime;
use rand::Rng;

use super::SampleGenerator;
use crate::anomaly::EnergyAnomaly;
use crate::constants::sensors::{BUSINESS_LOAD_FACTOR, CURRENT_STEP_A, IDLE_LOAD_FACTOR, VOLTAGE_STEP_V};
use crate::samples::EnergySample;
use crate::templates::EnergyTemplate;
use crate::time::is_business_hours;

impl SampleGenerator for EnergyTemplate {
    type Sample = EnergySample;
    type Anomaly = EnergyAnomaly;

    fn next_sample<R: Rng + ?Sized>(
        &self,
        at: NaiveDateTime,
        previous: Option<&EnergySample>,
        anomaly: Option<&EnergyAnomaly>,
        rng: &mut R,
    ) -> EnergySample {
        let (voltage, current) = previous
            .map(|p| (p.voltage, p.current))
            .unwrap_or((self.target_voltage, self.target_current));

        let load = if is_business_hours(at) { BUSINESS_LOAD_FACTOR } else { IDLE_LOAD_FACTOR };
        let voltage_change = rng.gen_range(-VOLTAGE_STEP_V..=VOLTAGE_STEP_V);
        let current_change = rng.gen_range(-CURRENT_STEP_A..=CURRENT_STEP_A) * load;

        let (voltage, current) = match anomaly {
            Some(fault) => fault.apply((voltage, current), rng),
            None => (
                self.voltage_band().clamp(voltage + voltage_change),
                self.current_band().clamp(current + current_change),
            ),
        };

        EnergySample::from_raw(voltage, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    const LIGHTING: EnergyTemplate = EnergyTemplate {
        target_voltage: 230.0,
        voltage_tolerance: 10.0,
        target_current: 5.0,
        current_tolerance: 1.0,
    };

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(hour, 30, 0).unwrap()
    }

    #[test]
    fn idle_current_moves_less() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = EnergySample::from_raw(230.0, 5.0);
        for _ in 0..200 {
            let sample = LIGHTING.next_sample(at(2), Some(&start), None, &mut rng);
            // 0.2 × 0.8 plus rounding
            assert!((sample.current - 5.0).abs() <= 0.2 + 1e-9);
            assert!((sample.voltage - 230.0).abs() <= 0.5 + 1e-9);
        }
    }

    #[test]
    fn power_outage_collapses_both_readings() {
        let mut rng = StdRng::seed_from_u64(4);
        let start = EnergySample::from_raw(230.0, 5.0);
        let sample = LIGHTING.next_sample(at(14), Some(&start), Some(&EnergyAnomaly::PowerOutage), &mut rng);
        assert!(sample.voltage <= 46.0);
        assert!(sample.current <= 1.0);
    }
}
