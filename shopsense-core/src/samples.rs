//! Sample types produced by the generators
//!
//! Samples are immutable once produced. Each generator step takes the previous
//! sample of the same shape and returns a new one.

use serde::{Deserialize, Serialize, Serializer};

use crate::constants::sensors::{MOLD_HUMIDITY_PCT, MOLD_TEMPERATURE_C};

/// Climate reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateSample {
    /// °C, one decimal
    pub temperature: f64,
    /// %RH, one decimal
    pub humidity: f64,
    /// ppm, whole number
    #[serde(serialize_with = "serialize_whole")]
    pub co2: f64,
    /// Humid and warm enough for mold to grow
    #[serde(rename = "moldy?", default)]
    pub mold_risk: bool,
}

impl ClimateSample {
    /// Build a rounded sample; the mold flag uses the unrounded values
    pub fn from_raw(temperature: f64, humidity: f64, co2: f64) -> Self {
        Self {
            temperature: round_to_tenth(temperature),
            humidity: round_to_tenth(humidity),
            co2: co2.round_ties_even(),
            mold_risk: mold_risk(humidity, temperature),
        }
    }
}

/// Energy reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    /// V, one decimal
    pub voltage: f64,
    /// A, one decimal
    pub current: f64,
}

impl EnergySample {
    pub fn from_raw(voltage: f64, current: f64) -> Self {
        Self { voltage: round_to_tenth(voltage), current: round_to_tenth(current) }
    }
}

/// Distance reading, shared by fill-level and door sensors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    /// Distance units (cm), one decimal
    pub distance: f64,
}

impl DistanceSample {
    pub fn from_raw(distance: f64) -> Self {
        Self { distance: round_to_tenth(distance) }
    }
}

/// Any sample, persisted untagged as the sensor's `data`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    Climate(ClimateSample),
    Energy(EnergySample),
    Distance(DistanceSample),
}

impl Sample {
    pub fn as_climate(&self) -> Option<&ClimateSample> {
        match self {
            Sample::Climate(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_energy(&self) -> Option<&EnergySample> {
        match self {
            Sample::Energy(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_distance(&self) -> Option<&DistanceSample> {
        match self {
            Sample::Distance(s) => Some(s),
            _ => None,
        }
    }
}

impl From<ClimateSample> for Sample {
    fn from(sample: ClimateSample) -> Self {
        Sample::Climate(sample)
    }
}

impl From<EnergySample> for Sample {
    fn from(sample: EnergySample) -> Self {
        Sample::Energy(sample)
    }
}

impl From<DistanceSample> for Sample {
    fn from(sample: DistanceSample) -> Self {
        Sample::Distance(sample)
    }
}

/// Mold risk: humidity above 65 %RH while warmer than 22 °C
pub fn mold_risk(humidity: f64, temperature: f64) -> bool {
    humidity > MOLD_HUMIDITY_PCT && temperature > MOLD_TEMPERATURE_C
}

/// Round half to even at one decimal
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn serialize_whole<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.round_ties_even() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climate_sample_persists_original_keys() {
        let sample = ClimateSample::from_raw(22.46, 66.04, 811.6);
        let json = serde_json::to_string(&Sample::from(sample)).unwrap();
        assert_eq!(json, r#"{"temperature":22.5,"humidity":66.0,"co2":812,"moldy?":true}"#);
    }

    #[test]
    fn mold_flag_uses_unrounded_values() {
        // 22.04 rounds to 22.0 but still counts as warmer than 22
        let sample = ClimateSample::from_raw(22.04, 70.0, 800.0);
        assert_eq!(sample.temperature, 22.0);
        assert!(sample.mold_risk);
    }

    #[test]
    fn untagged_samples_are_recognised_by_fields() {
        let energy: Sample = serde_json::from_str(r#"{"voltage":229.8,"current":5.1}"#).unwrap();
        assert!(energy.as_energy().is_some());

        let distance: Sample = serde_json::from_str(r#"{"distance":31.4}"#).unwrap();
        assert_eq!(distance.as_distance().map(|d| d.distance), Some(31.4));

        let climate: Sample =
            serde_json::from_str(r#"{"temperature":4.1,"humidity":80.2,"co2":790}"#).unwrap();
        assert_eq!(climate.as_climate().map(|c| c.mold_risk), Some(false));
    }

    #[test]
    fn rounding_matches_one_decimal() {
        assert_eq!(round_to_tenth(3.14159), 3.1);
        assert_eq!(round_to_tenth(-0.26), -0.3);
        assert_eq!(EnergySample::from_raw(230.04, 4.96).current, 5.0);
    }
}
