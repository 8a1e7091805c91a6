//! Sensor status evaluation
//!
//! Classifies a sensor's current sample against its template:
//!
//! - climate and energy: critical beyond twice the tolerance on any
//!   measurement, warning beyond the tolerance
//! - fill level: critical below the critical fill percentage, warning below
//!   the warning percentage
//! - door: warning while open (beyond `target + tolerance`)
//!
//! A group's overall status is its most severe member.

use std::fmt;

use crate::samples::Sample;
use crate::sensor::Sensor;
use crate::templates::{FillTemplate, Template};

/// Health of a sensor, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorStatus {
    /// Sample and template do not belong together
    Unknown,
    Normal,
    Warning,
    Critical,
}

impl SensorStatus {
    pub const ALL: [SensorStatus; 4] =
        [SensorStatus::Critical, SensorStatus::Warning, SensorStatus::Normal, SensorStatus::Unknown];

    /// Severity weight (3 critical .. 0 unknown)
    pub const fn weight(&self) -> u8 {
        match self {
            SensorStatus::Critical => 3,
            SensorStatus::Warning => 2,
            SensorStatus::Normal => 1,
            SensorStatus::Unknown => 0,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            SensorStatus::Critical => "critical",
            SensorStatus::Warning => "warning",
            SensorStatus::Normal => "normal",
            SensorStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn deviation(value: f64, target: f64, tolerance: f64) -> SensorStatus {
    let diff = (value - target).abs();
    if diff > tolerance * 2.0 {
        SensorStatus::Critical
    } else if diff > tolerance {
        SensorStatus::Warning
    } else {
        SensorStatus::Normal
    }
}

impl FillTemplate {
    /// Fill percentage for a distance reading (100 = full)
    pub fn fill_percent(&self, distance: f64) -> f64 {
        (self.max_distance - distance) / (self.max_distance - self.min_distance) * 100.0
    }
}

/// Status of a sample under a template
pub fn evaluate_sample(template: &Template, sample: &Sample) -> SensorStatus {
    match (template, sample) {
        (Template::Climate(t), Sample::Climate(s)) => deviation(s.temperature, t.target_temperature, t.temp_tolerance)
            .max(deviation(s.humidity, t.target_humidity, t.humidity_tolerance))
            .max(deviation(s.co2, t.target_co2, t.co2_tolerance)),
        (Template::Energy(t), Sample::Energy(s)) => deviation(s.voltage, t.target_voltage, t.voltage_tolerance)
            .max(deviation(s.current, t.target_current, t.current_tolerance)),
        (Template::Fill(t), Sample::Distance(s)) => {
            let fill = t.fill_percent(s.distance);
            if fill < t.critical_threshold {
                SensorStatus::Critical
            } else if fill < t.warning_threshold {
                SensorStatus::Warning
            } else {
                SensorStatus::Normal
            }
        }
        (Template::Door(t), Sample::Distance(s)) => {
            if s.distance > t.target_distance + t.tolerance {
                SensorStatus::Warning
            } else {
                SensorStatus::Normal
            }
        }
        _ => SensorStatus::Unknown,
    }
}

/// Status of a sensor's current sample
pub fn evaluate(sensor: &Sensor) -> SensorStatus {
    evaluate_sample(&sensor.parameters, &sensor.data)
}

/// Most severe status in a group; `None` for an empty group
pub fn overall_status<'a>(sensors: impl IntoIterator<Item = &'a Sensor>) -> Option<SensorStatus> {
    sensors.into_iter().map(evaluate).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{ClimateSample, DistanceSample, EnergySample};
    use crate::templates::{CLIMATE_TEMPLATES, DEFAULT_DOOR, DEFAULT_FILL, ENERGY_TEMPLATES};

    #[test]
    fn climate_thresholds() {
        // retail room: 22 ± 1 °C, 50 ± 10 %, 800 ± 200 ppm
        let template = CLIMATE_TEMPLATES[0].template;
        let at = |t, h, c| evaluate_sample(&template, &ClimateSample::from_raw(t, h, c).into());

        assert_eq!(at(22.5, 55.0, 850.0), SensorStatus::Normal);
        assert_eq!(at(23.5, 55.0, 850.0), SensorStatus::Warning);
        assert_eq!(at(22.0, 50.0, 1300.0), SensorStatus::Critical);
    }

    #[test]
    fn energy_thresholds() {
        // cooling plant: 230 ± 10 V, 10 ± 1 A
        let template = ENERGY_TEMPLATES[0].template;
        assert_eq!(evaluate_sample(&template, &EnergySample::from_raw(232.0, 10.4).into()), SensorStatus::Normal);
        assert_eq!(evaluate_sample(&template, &EnergySample::from_raw(215.0, 10.0).into()), SensorStatus::Warning);
        assert_eq!(evaluate_sample(&template, &EnergySample::from_raw(230.0, 12.5).into()), SensorStatus::Critical);
    }

    #[test]
    fn fill_and_door_thresholds() {
        let fill = DEFAULT_FILL.template;
        assert_eq!(evaluate_sample(&fill, &DistanceSample::from_raw(30.0).into()), SensorStatus::Normal);
        assert_eq!(evaluate_sample(&fill, &DistanceSample::from_raw(70.0).into()), SensorStatus::Warning);
        assert_eq!(evaluate_sample(&fill, &DistanceSample::from_raw(90.0).into()), SensorStatus::Critical);

        let door = DEFAULT_DOOR.template;
        assert_eq!(evaluate_sample(&door, &DistanceSample::from_raw(5.0).into()), SensorStatus::Normal);
        assert_eq!(evaluate_sample(&door, &DistanceSample::from_raw(14.0).into()), SensorStatus::Warning);
    }

    #[test]
    fn mismatched_shapes_are_unknown() {
        let sample = EnergySample::from_raw(230.0, 5.0).into();
        assert_eq!(evaluate_sample(&DEFAULT_DOOR.template, &sample), SensorStatus::Unknown);
    }

    #[test]
    fn severity_order_matches_weights() {
        assert!(SensorStatus::Critical > SensorStatus::Warning);
        assert!(SensorStatus::Normal > SensorStatus::Unknown);
        let mut by_weight = SensorStatus::ALL;
        by_weight.sort_by_key(|s| s.weight());
        let mut by_order = SensorStatus::ALL;
        by_order.sort();
        assert_eq!(by_weight, by_order);
        assert_eq!(overall_status(std::iter::empty::<&Sensor>()), None);
    }
}
