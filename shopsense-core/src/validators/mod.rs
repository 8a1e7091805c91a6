//! Template Validation
//!
//! ## Overview
//!
//! Templates are read back from hand-editable JSON, so nothing guarantees
//! their numbers make sense. Before a history is generated the template is
//! checked here; an invalid one is refused with
//! [`SimulationError::InvalidParameter`](crate::SimulationError::InvalidParameter)
//! naming the field.
//!
//! ## Rules
//!
//! | Template | Rule |
//! |----------|------|
//! | all | every number finite |
//! | climate | tolerances > 0, target humidity in [0, 100] |
//! | energy | tolerances > 0 |
//! | fill level | `minDistance < maxDistance`, thresholds in [0, 100] |
//! | door | tolerance > 0 |
//!
//! Zero is a perfectly valid target (a door sensor mounted flush reads 0).
//!
//! ## Usage Example
//!
//! ```rust
//! use shopsense_core::templates::{Template, DoorTemplate};
//! use shopsense_core::validators::validate_template;
//!
//! let flush = Template::Door(DoorTemplate { target_distance: 0.0, tolerance: 2.0 });
//! assert!(validate_template(&flush).is_ok());
//!
//! let rigid = Template::Door(DoorTemplate { target_distance: 5.0, tolerance: 0.0 });
//! assert!(validate_template(&rigid).is_err());
//! ```

mod utils;

pub use utils::{check_finite, check_ordered, check_positive, check_probability, check_range};

use crate::errors::SimulationResult;
use crate::templates::{ClimateTemplate, DoorTemplate, EnergyTemplate, FillTemplate, Template};

/// Something whose parameters can be checked before use
pub trait Validate {
    fn validate(&self) -> SimulationResult<()>;
}

impl Validate for ClimateTemplate {
    fn validate(&self) -> SimulationResult<()> {
        check_finite("targetTemperature", self.target_temperature)?;
        check_positive("tempTolerance", self.temp_tolerance)?;
        check_range("targetHumidity", self.target_humidity, 0.0, 100.0)?;
        check_positive("humidityTolerance", self.humidity_tolerance)?;
        check_finite("targetCO2", self.target_co2)?;
        check_positive("co2Tolerance", self.co2_tolerance)
    }
}

impl Validate for EnergyTemplate {
    fn validate(&self) -> SimulationResult<()> {
        check_finite("targetVoltage", self.target_voltage)?;
        check_positive("voltageTolerance", self.voltage_tolerance)?;
        check_finite("targetCurrent", self.target_current)?;
        check_positive("currentTolerance", self.current_tolerance)
    }
}

impl Validate for FillTemplate {
    fn validate(&self) -> SimulationResult<()> {
        check_finite("minDistance", self.min_distance)?;
        check_finite("maxDistance", self.max_distance)?;
        check_ordered("maxDistance", self.min_distance, self.max_distance)?;
        check_range("warningThreshold", self.warning_threshold, 0.0, 100.0)?;
        check_range("criticalThreshold", self.critical_threshold, 0.0, 100.0)
    }
}

impl Validate for DoorTemplate {
    fn validate(&self) -> SimulationResult<()> {
        check_finite("targetDistance", self.target_distance)?;
        check_positive("tolerance", self.tolerance)
    }
}

impl Validate for Template {
    fn validate(&self) -> SimulationResult<()> {
        match self {
            Template::Climate(t) => t.validate(),
            Template::Energy(t) => t.validate(),
            Template::Fill(t) => t.validate(),
            Template::Door(t) => t.validate(),
        }
    }
}

/// Check a template before generating from it
pub fn validate_template(template: &Template) -> SimulationResult<()> {
    template.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{CLIMATE_TEMPLATES, DEFAULT_DOOR, DEFAULT_FILL, ENERGY_TEMPLATES};
    use crate::SimulationError;

    #[test]
    fn catalog_is_valid() {
        for entry in CLIMATE_TEMPLATES.iter().chain(ENERGY_TEMPLATES.iter()).chain([&DEFAULT_FILL, &DEFAULT_DOOR]) {
            assert!(validate_template(&entry.template).is_ok(), "{} failed validation", entry.key);
        }
    }

    #[test]
    fn inverted_fill_bounds_are_rejected() {
        let template = Template::Fill(FillTemplate {
            min_distance: 80.0,
            max_distance: 20.0,
            warning_threshold: 40.0,
            critical_threshold: 20.0,
        });
        assert!(matches!(
            validate_template(&template),
            Err(SimulationError::InvalidParameter { field: "maxDistance", .. })
        ));
    }

    #[test]
    fn humidity_target_must_be_a_percentage() {
        let mut climate = match CLIMATE_TEMPLATES[1].template {
            Template::Climate(t) => t,
            other => panic!("unexpected template {other:?}"),
        };
        climate.target_humidity = 140.0;
        assert!(matches!(
            climate.validate(),
            Err(SimulationError::InvalidParameter { field: "targetHumidity", .. })
        ));
    }

    #[test]
    fn nan_targets_are_rejected() {
        let energy = EnergyTemplate {
            target_voltage: f64::NAN,
            voltage_tolerance: 10.0,
            target_current: 5.0,
            current_tolerance: 1.0,
        };
        assert!(energy.validate().is_err());
    }
}
