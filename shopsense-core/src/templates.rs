//! Sensor templates and the named template catalog
//!
//! A template fixes the targets and tolerances a sensor's random walk is
//! anchored to. It is chosen once when the sensor is created and persisted
//! verbatim as the sensor's `parameters` object.
//!
//! ## Catalog
//!
//! | Key | Category | Target | Tolerance |
//! |-----|----------|--------|-----------|
//! | `retail_room` | climate | 22 °C / 50 % / 800 ppm | 1 / 10 / 200 |
//! | `standard_cooling` | climate | 6 °C / 70 % / 800 ppm | 2 / 5 / 200 |
//! | `deep_freezing` | climate | -19 °C / 85 % / 800 ppm | 1 / 5 / 200 |
//! | `fruits_vegetables` | climate | 10 °C / 90 % / 800 ppm | 2 / 5 / 200 |
//! | `bakery` | climate | 21 °C / 55 % / 800 ppm | 1 / 5 / 200 |
//! | `meat` | climate | 3 °C / 88 % / 800 ppm | 1 / 3 / 200 |
//! | `dairy` | climate | 6 °C / 80 % / 800 ppm | 2 / 5 / 200 |
//! | `cooling_system` | energy | 230 V / 10 A | 10 / 1 |
//! | `lighting` | energy | 230 V / 5 A | 10 / 1 |
//! | `it_systems` | energy | 230 V / 3 A | 5 / 0.5 |

use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::sensors::TOLERANCE_BAND_FACTOR;
use crate::constants::time::{DEFAULT_INTERVAL_MINUTES, DOOR_INTERVAL_MINUTES};
use crate::sensor::{SensorKind, UseCase};

/// Climate targets: temperature (°C), relative humidity (%), CO2 (ppm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateTemplate {
    pub target_temperature: f64,
    pub temp_tolerance: f64,
    pub target_humidity: f64,
    pub humidity_tolerance: f64,
    #[serde(rename = "targetCO2")]
    pub target_co2: f64,
    pub co2_tolerance: f64,
}

/// Energy targets: voltage (V) and current (A)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyTemplate {
    pub target_voltage: f64,
    pub voltage_tolerance: f64,
    pub target_current: f64,
    pub current_tolerance: f64,
}

/// Fill-level bounds
///
/// Distance grows as stock is consumed: `min_distance` is full,
/// `max_distance` is empty. Thresholds are fill percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillTemplate {
    pub min_distance: f64,
    pub max_distance: f64,
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,
}

/// Door geometry: closed reads `target_distance`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorTemplate {
    pub target_distance: f64,
    pub tolerance: f64,
}

fn default_warning_threshold() -> f64 {
    40.0
}

fn default_critical_threshold() -> f64 {
    20.0
}

/// Any sensor template
///
/// Persisted without a tag; the variant is recognised by its field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
    Climate(ClimateTemplate),
    Energy(EnergyTemplate),
    Fill(FillTemplate),
    Door(DoorTemplate),
}

impl Template {
    /// Sensor category this template belongs to
    pub const fn kind(&self) -> SensorKind {
        match self {
            Template::Climate(_) => SensorKind::Climate,
            Template::Energy(_) => SensorKind::Energy,
            Template::Fill(_) | Template::Door(_) => SensorKind::Distance,
        }
    }

    /// Use case implied by the template shape
    pub const fn use_case(&self) -> UseCase {
        match self {
            Template::Climate(_) => UseCase::RoomClimate,
            Template::Energy(_) => UseCase::PowerSupply,
            Template::Fill(_) => UseCase::FillLevel,
            Template::Door(_) => UseCase::Openings,
        }
    }

    /// Sampling interval of histories generated from this template
    pub fn interval(&self) -> Duration {
        match self {
            Template::Door(_) => Duration::minutes(DOOR_INTERVAL_MINUTES),
            _ => Duration::minutes(DEFAULT_INTERVAL_MINUTES),
        }
    }
}

/// Inclusive `target ± 3 × tolerance` band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn around(target: f64, tolerance: f64) -> Self {
        let half_width = tolerance * TOLERANCE_BAND_FACTOR;
        Self { low: target - half_width, high: target + half_width }
    }

    /// Clamp into the band; `min` then `max` so a degenerate band never panics
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.high).max(self.low)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

impl ClimateTemplate {
    pub fn temperature_band(&self) -> Band {
        Band::around(self.target_temperature, self.temp_tolerance)
    }

    pub fn humidity_band(&self) -> Band {
        Band::around(self.target_humidity, self.humidity_tolerance)
    }

    pub fn co2_band(&self) -> Band {
        Band::around(self.target_co2, self.co2_tolerance)
    }
}

impl EnergyTemplate {
    pub fn voltage_band(&self) -> Band {
        Band::around(self.target_voltage, self.voltage_tolerance)
    }

    pub fn current_band(&self) -> Band {
        Band::around(self.target_current, self.current_tolerance)
    }
}

impl DoorTemplate {
    /// Reading of a fully open door
    pub fn open_distance(&self) -> f64 {
        self.target_distance + self.tolerance * crate::constants::sensors::DOOR_OPEN_TOLERANCE_FACTOR
    }
}

/// Catalog entry: lookup key, display name and parameters
#[derive(Debug, Clone, Copy)]
pub struct NamedTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub template: Template,
}

const fn climate(
    key: &'static str,
    name: &'static str,
    temperature: (f64, f64),
    humidity: (f64, f64),
) -> NamedTemplate {
    NamedTemplate {
        key,
        name,
        template: Template::Climate(ClimateTemplate {
            target_temperature: temperature.0,
            temp_tolerance: temperature.1,
            target_humidity: humidity.0,
            humidity_tolerance: humidity.1,
            target_co2: 800.0,
            co2_tolerance: 200.0,
        }),
    }
}

const fn energy(key: &'static str, name: &'static str, voltage: (f64, f64), current: (f64, f64)) -> NamedTemplate {
    NamedTemplate {
        key,
        name,
        template: Template::Energy(EnergyTemplate {
            target_voltage: voltage.0,
            voltage_tolerance: voltage.1,
            target_current: current.0,
            current_tolerance: current.1,
        }),
    }
}

/// Climate templates for shop zones and refrigerated goods
pub static CLIMATE_TEMPLATES: [NamedTemplate; 7] = [
    climate("retail_room", "Sales floor", (22.0, 1.0), (50.0, 10.0)),
    climate("standard_cooling", "Standard cooling", (6.0, 2.0), (70.0, 5.0)),
    climate("deep_freezing", "Deep freezing", (-19.0, 1.0), (85.0, 5.0)),
    climate("fruits_vegetables", "Fruit & vegetables", (10.0, 2.0), (90.0, 5.0)),
    climate("bakery", "Bakery", (21.0, 1.0), (55.0, 5.0)),
    climate("meat", "Meat & sausages", (3.0, 1.0), (88.0, 3.0)),
    climate("dairy", "Dairy products", (6.0, 2.0), (80.0, 5.0)),
];

/// Energy templates for shop installations
pub static ENERGY_TEMPLATES: [NamedTemplate; 3] = [
    energy("cooling_system", "Cooling plant", (230.0, 10.0), (10.0, 1.0)),
    energy("lighting", "Lighting", (230.0, 10.0), (5.0, 1.0)),
    energy("it_systems", "IT systems", (230.0, 5.0), (3.0, 0.5)),
];

/// Shelf fill-level sensor
pub static DEFAULT_FILL: NamedTemplate = NamedTemplate {
    key: "shelf_fill",
    name: "Shelf fill level",
    template: Template::Fill(FillTemplate {
        min_distance: 0.0,
        max_distance: 100.0,
        warning_threshold: 40.0,
        critical_threshold: 20.0,
    }),
};

/// Door opening sensor
pub static DEFAULT_DOOR: NamedTemplate = NamedTemplate {
    key: "door",
    name: "Door",
    template: Template::Door(DoorTemplate { target_distance: 5.0, tolerance: 3.0 }),
};

/// Find a catalog entry by key
pub fn lookup(key: &str) -> Option<&'static NamedTemplate> {
    CLIMATE_TEMPLATES
        .iter()
        .chain(ENERGY_TEMPLATES.iter())
        .chain([&DEFAULT_FILL, &DEFAULT_DOOR])
        .find(|entry| entry.key == key)
}

/// Pick a template uniformly for a use case
///
/// Climate and energy draw from their catalogs; fill and door sensors have a
/// single default each.
pub fn random_template<R: Rng + ?Sized>(use_case: UseCase, rng: &mut R) -> &'static NamedTemplate {
    match use_case {
        UseCase::RoomClimate => &CLIMATE_TEMPLATES[rng.gen_range(0..CLIMATE_TEMPLATES.len())],
        UseCase::PowerSupply => &ENERGY_TEMPLATES[rng.gen_range(0..ENERGY_TEMPLATES.len())],
        UseCase::FillLevel => &DEFAULT_FILL,
        UseCase::Openings => &DEFAULT_DOOR,
    }
}
