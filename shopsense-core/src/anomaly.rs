//! Anomaly catalog
//!
//! ## Overview
//!
//! An anomaly is a time-bounded fault. While one is active, the generators
//! stop their normal bounded walk and instead push the previous reading
//! through the anomaly's transform. Each category has its own closed set of
//! faults:
//!
//! | Category | Anomaly | Transform |
//! |----------|---------|-----------|
//! | climate | `cooling_failure` | temp +5..10, humidity +10..20, CO2 unchanged |
//! | climate | `ventilation_failure` | temp +2..4, humidity +15..25, CO2 +300..500 |
//! | climate | `sensor_malfunction` | every value × 0.5..1.5 |
//! | energy | `voltage_spike` | voltage × 1.2..1.4 |
//! | energy | `power_outage` | voltage and current × 0..0.2 |
//! | energy | `overload` | voltage × 0.8..0.9, current × 1.5..2.0 |
//! | fill level | `sensor_error` | distance × 1.5..2.0 |
//! | fill level | `sudden_empty` | distance × 0.9..1.0 |
//! | door | `door_stuck` | distance +5..10 |
//! | door | `sensor_loose` | distance × 0.5..1.5 |
//!
//! Random factors are drawn again on every application, so a cooling failure
//! keeps warming the room step after step.
//!
//! Selection within a category is uniform. Asking for an unknown category
//! yields `None`; callers treat that as "no anomaly available".

use std::fmt;

use rand::Rng;

use crate::constants::sensors::{
    COOLING_FAILURE_HUMIDITY_PCT, COOLING_FAILURE_TEMP_C, DOOR_STUCK_OFFSET,
    FILL_SENSOR_ERROR_FACTOR, MALFUNCTION_FACTOR, OVERLOAD_CURRENT_FACTOR,
    OVERLOAD_VOLTAGE_FACTOR, POWER_OUTAGE_FACTOR, SUDDEN_EMPTY_FACTOR,
    VENTILATION_FAILURE_CO2_PPM, VENTILATION_FAILURE_HUMIDITY_PCT,
    VENTILATION_FAILURE_TEMP_C, VOLTAGE_SPIKE_FACTOR,
};
use crate::sensor::UseCase;

fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    rng.gen_range(low..=high)
}

/// Climate faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateAnomaly {
    CoolingFailure,
    VentilationFailure,
    SensorMalfunction,
}

impl ClimateAnomaly {
    pub const ALL: [Self; 3] = [Self::CoolingFailure, Self::VentilationFailure, Self::SensorMalfunction];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::CoolingFailure => "cooling_failure",
            Self::VentilationFailure => "ventilation_failure",
            Self::SensorMalfunction => "sensor_malfunction",
        }
    }

    /// Transform `(temperature, humidity, co2)`
    pub fn apply<R: Rng + ?Sized>(&self, (temperature, humidity, co2): (f64, f64, f64), rng: &mut R) -> (f64, f64, f64) {
        match self {
            Self::CoolingFailure => (
                temperature + uniform(rng, COOLING_FAILURE_TEMP_C),
                humidity + uniform(rng, COOLING_FAILURE_HUMIDITY_PCT),
                co2,
            ),
            Self::VentilationFailure => (
                temperature + uniform(rng, VENTILATION_FAILURE_TEMP_C),
                humidity + uniform(rng, VENTILATION_FAILURE_HUMIDITY_PCT),
                co2 + uniform(rng, VENTILATION_FAILURE_CO2_PPM),
            ),
            Self::SensorMalfunction => (
                temperature * uniform(rng, MALFUNCTION_FACTOR),
                humidity * uniform(rng, MALFUNCTION_FACTOR),
                co2 * uniform(rng, MALFUNCTION_FACTOR),
            ),
        }
    }
}

/// Power supply faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergyAnomaly {
    VoltageSpike,
    PowerOutage,
    Overload,
}

impl EnergyAnomaly {
    pub const ALL: [Self; 3] = [Self::VoltageSpike, Self::PowerOutage, Self::Overload];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::VoltageSpike => "voltage_spike",
            Self::PowerOutage => "power_outage",
            Self::Overload => "overload",
        }
    }

    /// Transform `(voltage, current)`
    pub fn apply<R: Rng + ?Sized>(&self, (voltage, current): (f64, f64), rng: &mut R) -> (f64, f64) {
        match self {
            Self::VoltageSpike => (voltage * uniform(rng, VOLTAGE_SPIKE_FACTOR), current),
            Self::PowerOutage => (
                voltage * uniform(rng, POWER_OUTAGE_FACTOR),
                current * uniform(rng, POWER_OUTAGE_FACTOR),
            ),
            Self::Overload => (
                voltage * uniform(rng, OVERLOAD_VOLTAGE_FACTOR),
                current * uniform(rng, OVERLOAD_CURRENT_FACTOR),
            ),
        }
    }
}

/// Fill-level faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillAnomaly {
    SensorError,
    SuddenEmpty,
}

impl FillAnomaly {
    pub const ALL: [Self; 2] = [Self::SensorError, Self::SuddenEmpty];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::SensorError => "sensor_error",
            Self::SuddenEmpty => "sudden_empty",
        }
    }

    pub fn apply<R: Rng + ?Sized>(&self, distance: f64, rng: &mut R) -> f64 {
        match self {
            Self::SensorError => distance * uniform(rng, FILL_SENSOR_ERROR_FACTOR),
            Self::SuddenEmpty => distance * uniform(rng, SUDDEN_EMPTY_FACTOR),
        }
    }
}

/// Door sensor faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorAnomaly {
    DoorStuck,
    SensorLoose,
}

impl DoorAnomaly {
    pub const ALL: [Self; 2] = [Self::DoorStuck, Self::SensorLoose];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::DoorStuck => "door_stuck",
            Self::SensorLoose => "sensor_loose",
        }
    }

    pub fn apply<R: Rng + ?Sized>(&self, distance: f64, rng: &mut R) -> f64 {
        match self {
            Self::DoorStuck => distance + uniform(rng, DOOR_STUCK_OFFSET),
            Self::SensorLoose => distance * uniform(rng, MALFUNCTION_FACTOR),
        }
    }
}

/// Any fault, tagged by the sensor shape it applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anomaly {
    Climate(ClimateAnomaly),
    Energy(EnergyAnomaly),
    Fill(FillAnomaly),
    Door(DoorAnomaly),
}

impl Anomaly {
    /// Catalog name, e.g. `"cooling_failure"`
    pub const fn name(&self) -> &'static str {
        match self {
            Anomaly::Climate(a) => a.name(),
            Anomaly::Energy(a) => a.name(),
            Anomaly::Fill(a) => a.name(),
            Anomaly::Door(a) => a.name(),
        }
    }

    /// Pick a fault uniformly from the catalog of a use case
    pub fn random_for<R: Rng + ?Sized>(use_case: UseCase, rng: &mut R) -> Self {
        match use_case {
            UseCase::RoomClimate => {
                Anomaly::Climate(ClimateAnomaly::ALL[rng.gen_range(0..ClimateAnomaly::ALL.len())])
            }
            UseCase::PowerSupply => {
                Anomaly::Energy(EnergyAnomaly::ALL[rng.gen_range(0..EnergyAnomaly::ALL.len())])
            }
            UseCase::FillLevel => Anomaly::Fill(FillAnomaly::ALL[rng.gen_range(0..FillAnomaly::ALL.len())]),
            UseCase::Openings => Anomaly::Door(DoorAnomaly::ALL[rng.gen_range(0..DoorAnomaly::ALL.len())]),
        }
    }

    pub fn as_climate(&self) -> Option<&ClimateAnomaly> {
        match self {
            Anomaly::Climate(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_energy(&self) -> Option<&EnergyAnomaly> {
        match self {
            Anomaly::Energy(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_fill(&self) -> Option<&FillAnomaly> {
        match self {
            Anomaly::Fill(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_door(&self) -> Option<&DoorAnomaly> {
        match self {
            Anomaly::Door(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick a fault by persisted category name and use-case number
///
/// `use_case` is only consulted for `"distance"` (1 = fill level, 3 = door).
/// Unknown categories and unknown distance use cases return `None`.
pub fn select_anomaly<R: Rng + ?Sized>(category: &str, use_case: Option<u8>, rng: &mut R) -> Option<Anomaly> {
    let use_case = match category {
        "climate" => UseCase::RoomClimate,
        "energy" => UseCase::PowerSupply,
        "distance" => match use_case.and_then(|id| UseCase::try_from(id).ok())? {
            distance @ (UseCase::FillLevel | UseCase::Openings) => distance,
            _ => return None,
        },
        _ => return None,
    };
    Some(Anomaly::random_for(use_case, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn unknown_category_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_anomaly("pressure", None, &mut rng), None);
        assert_eq!(select_anomaly("distance", Some(2), &mut rng), None);
        assert_eq!(select_anomaly("distance", None, &mut rng), None);
    }

    #[test]
    fn selection_stays_within_category() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert!(matches!(select_anomaly("climate", None, &mut rng), Some(Anomaly::Climate(_))));
            assert!(matches!(select_anomaly("energy", Some(4), &mut rng), Some(Anomaly::Energy(_))));
            assert!(matches!(select_anomaly("distance", Some(1), &mut rng), Some(Anomaly::Fill(_))));
            assert!(matches!(select_anomaly("distance", Some(3), &mut rng), Some(Anomaly::Door(_))));
        }
    }

    #[test]
    fn every_climate_fault_is_reachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(Anomaly::random_for(UseCase::RoomClimate, &mut rng));
        }
        assert_eq!(seen.len(), ClimateAnomaly::ALL.len());
    }

    #[test]
    fn transforms_stay_in_their_ranges() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let (t, h, c) = ClimateAnomaly::CoolingFailure.apply((20.0, 50.0, 800.0), &mut rng);
            assert!((25.0..=30.0).contains(&t));
            assert!((60.0..=70.0).contains(&h));
            assert_eq!(c, 800.0);

            let (v, i) = EnergyAnomaly::VoltageSpike.apply((230.0, 5.0), &mut rng);
            assert!((276.0 - 1e-9..=322.0 + 1e-9).contains(&v));
            assert_eq!(i, 5.0);

            let (v, i) = EnergyAnomaly::PowerOutage.apply((230.0, 5.0), &mut rng);
            assert!(v <= 46.0 + 1e-9 && i <= 1.0 + 1e-9);

            let d = DoorAnomaly::DoorStuck.apply(5.0, &mut rng);
            assert!((10.0..=15.0).contains(&d));

            let d = FillAnomaly::SuddenEmpty.apply(50.0, &mut rng);
            assert!((45.0 - 1e-9..=50.0).contains(&d));
        }
    }
}
