//! Sensor-list extender
//!
//! Appends random sensors to an existing list. Each new sensor gets the next
//! free integer id, a uniformly chosen category, a catalog template for that
//! category (fill level or door for distance sensors, half and half), and a
//! history walked up to "now".

use chrono::NaiveDateTime;
use log::info;
use rand::Rng;

use shopsense_core::constants::DEFAULT_HISTORY_DAYS;
use shopsense_core::templates::random_template;
use shopsense_core::{history_start, HistoryWalker, Sensor, SensorId, SensorKind, UseCase, WalkerConfig};

use crate::SchemaResult;

/// Extender tuning
#[derive(Debug, Clone)]
pub struct ExtenderConfig {
    /// Days of history per new sensor
    pub history_days: i64,
    pub walker: WalkerConfig,
}

impl Default for ExtenderConfig {
    fn default() -> Self {
        Self { history_days: DEFAULT_HISTORY_DAYS, walker: WalkerConfig::default() }
    }
}

/// Adds randomly configured sensors to a sensor list
#[derive(Debug, Clone, Default)]
pub struct SensorListExtender {
    config: ExtenderConfig,
}

impl SensorListExtender {
    pub fn new(config: ExtenderConfig) -> Self {
        Self { config }
    }

    /// Append `count` sensors with histories ending at `now`
    ///
    /// Returns the ids of the new sensors. Nothing is appended if any
    /// history fails to generate.
    pub fn add_sensors<R: Rng + ?Sized>(
        &self,
        sensors: &mut Vec<Sensor>,
        count: usize,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> SchemaResult<Vec<SensorId>> {
        let walker = HistoryWalker::new(self.config.walker.clone());
        let start = history_start(now, self.config.history_days)?;
        let mut next_id = next_numeric_id(sensors);

        let mut added = Vec::with_capacity(count);
        for _ in 0..count {
            let use_case = random_use_case(rng);
            let named = random_template(use_case, rng);
            let outcome = walker.walk(&named.template, start, now, rng)?;

            let sensor = Sensor::new(SensorId::Numeric(next_id), named.template, outcome.history)?;
            info!("added sensor {} ({}, use case {}, template {})", next_id, sensor.kind, use_case.id(), named.key);
            added.push(sensor);
            next_id += 1;
        }

        let ids = added.iter().map(|s| s.id.clone()).collect();
        sensors.extend(added);
        Ok(ids)
    }
}

/// One more than the largest integer id; text ids are ignored
pub fn next_numeric_id(sensors: &[Sensor]) -> u64 {
    sensors
        .iter()
        .filter_map(|s| match s.id {
            SensorId::Numeric(n) => Some(n),
            SensorId::Text(_) => None,
        })
        .max()
        .map_or(1, |max| max + 1)
}

fn random_use_case<R: Rng + ?Sized>(rng: &mut R) -> UseCase {
    match SensorKind::ALL[rng.gen_range(0..SensorKind::ALL.len())] {
        SensorKind::Climate => UseCase::RoomClimate,
        SensorKind::Energy => UseCase::PowerSupply,
        SensorKind::Distance if rng.gen_bool(0.5) => UseCase::FillLevel,
        SensorKind::Distance => UseCase::Openings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaError;
    use chrono::NaiveDate;
    use shopsense_core::SimulationError;
    use rand::{rngs::StdRng, SeedableRng};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn short() -> SensorListExtender {
        SensorListExtender::new(ExtenderConfig { history_days: 1, ..ExtenderConfig::default() })
    }

    #[test]
    fn ids_continue_after_the_largest() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sensors = Vec::new();
        let first = short().add_sensors(&mut sensors, 3, now(), &mut rng).unwrap();
        assert_eq!(first, vec![SensorId::Numeric(1), SensorId::Numeric(2), SensorId::Numeric(3)]);

        sensors.remove(1);
        let next = short().add_sensors(&mut sensors, 1, now(), &mut rng).unwrap();
        assert_eq!(next, vec![SensorId::Numeric(4)]);
        assert_eq!(sensors.len(), 3);
    }

    #[test]
    fn new_sensors_are_matched_and_current() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sensors = Vec::new();
        short().add_sensors(&mut sensors, 20, now(), &mut rng).unwrap();

        for sensor in &sensors {
            assert_eq!(sensor.matched_use_case, Some(sensor.parameters.use_case()));
            assert_eq!(sensor.kind, sensor.parameters.kind());
            assert_eq!(Some(&sensor.data), sensor.history.last().map(|e| &e.data));
            assert!(sensor.history.last().unwrap().timestamp.naive() < now());
        }
    }

    #[test]
    fn every_use_case_is_reachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(random_use_case(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn oversized_history_is_refused_without_appending() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sensors = Vec::new();
        let extender = SensorListExtender::new(ExtenderConfig { history_days: 200_000_000, ..ExtenderConfig::default() });

        let result = extender.add_sensors(&mut sensors, 1, now(), &mut rng);
        assert!(matches!(
            result,
            Err(SchemaError::Simulation(SimulationError::InvalidParameter { field: "history_days", .. }))
        ));
        assert!(sensors.is_empty());
    }

    #[test]
    fn text_ids_do_not_affect_numbering() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut sensors = Vec::new();
        short().add_sensors(&mut sensors, 1, now(), &mut rng).unwrap();
        sensors[0].id = SensorId::Text("CLIM_0123456789ab".into());
        assert_eq!(next_numeric_id(&sensors), 1);
    }
}
