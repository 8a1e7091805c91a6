//! Shop Generator
//!
//! ## Overview
//!
//! Builds a complete fixture dataset for one shop from a fixed layout
//! blueprint:
//!
//! 1. **Rooms**: sales floor, cold storage, storeroom, bakery
//! 2. **Categories**: chilled shelves, dry goods, frozen goods, entrances
//! 3. **Assets**: every category allowed in a room contributes its asset
//!    definitions to that room
//! 4. **Sensors**: each asset carries the sensors its kind calls for, with
//!    a week of history walked up to "now"
//! 5. **Favourites**: a fifth of the sensors (at least one) plus one use case
//!
//! ## Warnings
//!
//! Each asset definition has a warning probability. A sensor drawn as
//! "warning" gets an anomaly forced into the last two hours of its history,
//! so the dashboard has something to flag on every run. The fault comes from
//! the same catalog and walker as spontaneous ones.
//!
//! ## Identifiers
//!
//! Every entity id is a prefix plus the first 12 hex digits of a random
//! UUID. The UUID bytes come from the injected RNG, so a seeded run is
//! reproducible end to end.
//!
//! | Entity | Prefix |
//! |--------|--------|
//! | room | `ROOM_` |
//! | category | `CAT_` |
//! | asset | `AST_` |
//! | climate / energy / door / fill sensor | `CLIM_` / `ENRG_` / `DOOR_` / `FILL_` |
//! | favourite | `FAV_` |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::Duration;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use shopsense_core::constants::DEFAULT_HISTORY_DAYS;
use shopsense_core::templates::{ClimateTemplate, DoorTemplate, EnergyTemplate, Template, DEFAULT_FILL};
use shopsense_core::{
    history_start, status, Clock, HistoryWalker, Sensor, SensorId, SensorKind, SensorStatus,
    SimulationError, Timestamp, UseCase, WalkerConfig,
};

use crate::registry::GLOBAL_REGISTRY;
use crate::{Asset, Category, Dataset, EntityType, Favorite, Room, SchemaResult};

/// What an asset is, which decides its sensors and their parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Chilled display or storage at room-like targets
    Cooler,
    /// Open counter for fresh goods
    FreshCounter,
    Freezer,
    /// Dry goods shelf with a fill-level sensor
    Shelf,
    /// Door with an opening sensor
    Entrance,
}

impl AssetKind {
    /// Templates of the sensors mounted on an asset of this kind
    pub fn sensor_templates(&self) -> Vec<Template> {
        let climate = |temperature: (f64, f64), humidity: (f64, f64)| {
            Template::Climate(ClimateTemplate {
                target_temperature: temperature.0,
                temp_tolerance: temperature.1,
                target_humidity: humidity.0,
                humidity_tolerance: humidity.1,
                target_co2: 800.0,
                co2_tolerance: 200.0,
            })
        };
        let energy = Template::Energy(EnergyTemplate {
            target_voltage: 230.0,
            voltage_tolerance: 10.0,
            target_current: 5.0,
            current_tolerance: 1.0,
        });

        match self {
            AssetKind::Freezer => vec![climate((-18.0, 2.0), (70.0, 5.0)), energy],
            AssetKind::FreshCounter => vec![climate((4.0, 1.0), (80.0, 10.0)), energy],
            AssetKind::Cooler => vec![climate((21.0, 2.0), (50.0, 10.0)), energy],
            AssetKind::Shelf => vec![DEFAULT_FILL.template],
            AssetKind::Entrance => vec![Template::Door(DoorTemplate { target_distance: 5.0, tolerance: 2.0 })],
        }
    }
}

/// Blueprint entry for one asset
#[derive(Debug, Clone, Copy)]
pub struct AssetDefinition {
    pub name: &'static str,
    pub kind: AssetKind,
    /// Chance per sensor of a forced recent anomaly
    pub warning_probability: f64,
}

const fn asset(name: &'static str, kind: AssetKind, warning_probability: f64) -> AssetDefinition {
    AssetDefinition { name, kind, warning_probability }
}

/// Rooms as `(name, description)`
pub static ROOMS: [(&str, &str); 4] = [
    ("Sales floor", "Main sales area with shelves and chilled counters"),
    ("Cold storage", "Chilled storage for perishable goods"),
    ("Storeroom", "Central storage for dry goods"),
    ("Bakery", "Baked goods and fresh produce"),
];

/// Categories as `(name, description)`
pub static CATEGORIES: [(&str, &str); 4] = [
    ("Chilled shelves", "Refrigerated sales areas"),
    ("Dry goods", "Shelves for unrefrigerated products"),
    ("Frozen goods", "Deep-freeze areas"),
    ("Entrances", "Entrances and exits"),
];

static CHILLED_SHELVES: [AssetDefinition; 3] = [
    asset("Dairy cooler", AssetKind::Cooler, 0.2),
    asset("Beverage cooler", AssetKind::Cooler, 0.1),
    asset("Fresh counter", AssetKind::FreshCounter, 0.3),
];

static DRY_GOODS: [AssetDefinition; 3] = [
    asset("Canned goods shelf", AssetKind::Shelf, 0.4),
    asset("Spice shelf", AssetKind::Shelf, 0.2),
    asset("Confectionery shelf", AssetKind::Shelf, 0.3),
];

static FROZEN_GOODS: [AssetDefinition; 2] = [
    asset("Freezer chest 1", AssetKind::Freezer, 0.1),
    asset("Freezer chest 2", AssetKind::Freezer, 0.2),
];

static ENTRANCES: [AssetDefinition; 2] = [
    asset("Main entrance", AssetKind::Entrance, 0.3),
    asset("Storeroom entrance", AssetKind::Entrance, 0.1),
];

/// Asset definitions per category
pub static ASSETS: [(&str, &[AssetDefinition]); 4] = [
    ("Chilled shelves", &CHILLED_SHELVES),
    ("Dry goods", &DRY_GOODS),
    ("Frozen goods", &FROZEN_GOODS),
    ("Entrances", &ENTRANCES),
];

/// Categories allowed in each room, in generation order
pub static ROOM_CATEGORIES: [(&str, &[&str]); 4] = [
    ("Sales floor", &["Chilled shelves", "Dry goods", "Entrances"]),
    ("Storeroom", &["Dry goods", "Entrances"]),
    ("Cold storage", &["Chilled shelves", "Frozen goods"]),
    ("Bakery", &["Chilled shelves", "Dry goods"]),
];

fn asset_definitions(category: &str) -> &'static [AssetDefinition] {
    ASSETS.iter().find(|(name, _)| *name == category).map(|(_, defs)| *defs).unwrap_or(&[])
}

fn asset_definition(name: &str) -> Option<&'static AssetDefinition> {
    ASSETS.iter().flat_map(|(_, defs)| defs.iter()).find(|def| def.name == name)
}

/// Prefix plus 12 hex digits of a UUID drawn from `rng`
pub fn generate_id<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let uuid = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    let hex = uuid.simple().to_string();
    format!("{prefix}{}", &hex[..12])
}

fn sensor_prefix(use_case: UseCase) -> &'static str {
    match use_case {
        UseCase::RoomClimate => "CLIM_",
        UseCase::PowerSupply => "ENRG_",
        UseCase::Openings => "DOOR_",
        UseCase::FillLevel => "FILL_",
    }
}

/// Shop generator tuning
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Days of history per sensor
    pub history_days: i64,
    /// How far before "now" a forced warning anomaly starts
    pub warning_lead: Duration,
    /// Share of sensors marked as favourites
    pub favorite_share: usize,
    /// Use this warning probability for every asset instead of the blueprint's
    pub warning_probability_override: Option<f64>,
    pub walker: WalkerConfig,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            history_days: DEFAULT_HISTORY_DAYS,
            warning_lead: Duration::hours(2),
            favorite_share: 5,
            warning_probability_override: None,
            walker: WalkerConfig::default(),
        }
    }
}

/// Generates a complete shop dataset
pub struct ShopGenerator<C: Clock> {
    config: ShopConfig,
    clock: C,
}

impl<C: Clock> ShopGenerator<C> {
    pub fn new(config: ShopConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Generate rooms, categories, assets, sensors and favourites
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SchemaResult<Dataset> {
        let now = self.clock.now();

        let rooms = self.add_rooms(rng);
        let categories = self.add_categories(rng);
        let assets = self.add_assets(&rooms, &categories, rng);
        let sensors = self.add_sensors(&assets, rng)?;
        let favorites = self.add_favorites(&sensors, rng);

        info!(
            "generated shop: {} rooms, {} assets, {} sensors, {} favourites at {}",
            rooms.len(),
            assets.len(),
            sensors.len(),
            favorites.len(),
            now
        );

        Ok(Dataset {
            sensors,
            rooms: Some(rooms),
            assets: Some(assets),
            categories: Some(categories),
            favorites: Some(favorites),
            ..Dataset::default()
        })
    }

    fn add_rooms<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Room> {
        ROOMS
            .iter()
            .map(|(name, _)| Room { name: name.to_string(), id: generate_id("ROOM_", rng) })
            .collect()
    }

    fn add_categories<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Category> {
        CATEGORIES
            .iter()
            .map(|(name, _)| Category { name: name.to_string(), id: generate_id("CAT_", rng) })
            .collect()
    }

    fn add_assets<R: Rng + ?Sized>(&self, rooms: &[Room], categories: &[Category], rng: &mut R) -> Vec<Asset> {
        let room_ids: BTreeMap<&str, &str> = rooms.iter().map(|r| (r.name.as_str(), r.id.as_str())).collect();
        let category_ids: BTreeMap<&str, &str> =
            categories.iter().map(|c| (c.name.as_str(), c.id.as_str())).collect();

        let mut assets = Vec::new();
        for (room_name, allowed) in ROOM_CATEGORIES.iter() {
            let Some(room_id) = room_ids.get(*room_name) else { continue };
            for category_name in allowed.iter() {
                let Some(category_id) = category_ids.get(*category_name) else { continue };
                for definition in asset_definitions(category_name) {
                    assets.push(Asset {
                        name: definition.name.to_string(),
                        id: generate_id("AST_", rng),
                        room_id: room_id.to_string(),
                        category_id: category_id.to_string(),
                    });
                }
            }
        }
        assets
    }

    fn add_sensors<R: Rng + ?Sized>(&self, assets: &[Asset], rng: &mut R) -> SchemaResult<Vec<Sensor>> {
        let now = self.clock.now();
        let start = history_start(now, self.config.history_days)?;
        let warning_from = now.checked_sub_signed(self.config.warning_lead).ok_or(SimulationError::InvalidParameter {
            field: "warning_lead",
            reason: "reaches beyond the representable calendar",
        })?;

        let mut sensors = Vec::new();
        for asset in assets {
            let Some(definition) = asset_definition(&asset.name) else { continue };
            let warning_probability =
                self.config.warning_probability_override.unwrap_or(definition.warning_probability);
            for template in definition.kind.sensor_templates() {
                let is_warning = rng.gen::<f64>() < warning_probability;
                let walker = HistoryWalker::new(WalkerConfig {
                    forced_anomaly_from: is_warning.then_some(warning_from),
                    ..self.config.walker.clone()
                });
                let outcome = walker.walk(&template, start, now, rng)?;

                let use_case = template.use_case();
                let id = SensorId::Text(generate_id(sensor_prefix(use_case), rng));
                debug!(
                    "{} on {}: {} entries, {} anomalies{}",
                    id,
                    asset.name,
                    outcome.history.len(),
                    outcome.anomalies.len(),
                    if is_warning { " (warning)" } else { "" }
                );

                sensors.push(Sensor::new(id, template, outcome.history)?.with_location(&asset.id, &asset.room_id));
            }
        }
        Ok(sensors)
    }

    fn add_favorites<R: Rng + ?Sized>(&self, sensors: &[Sensor], rng: &mut R) -> Vec<Favorite> {
        if sensors.is_empty() {
            return Vec::new();
        }
        let timestamp = Timestamp::local(self.clock.now());
        let count = (sensors.len() / self.config.favorite_share.max(1)).max(1);

        let mut favorites: Vec<Favorite> = sensors
            .choose_multiple(rng, count)
            .map(|sensor| Favorite {
                id: generate_id("FAV_", rng),
                entity_type: EntityType::Sensor,
                entity_id: sensor.id.to_string(),
                timestamp,
            })
            .collect();

        let use_cases: BTreeSet<UseCase> = sensors.iter().map(Sensor::use_case).collect();
        if let Some(first) = use_cases.into_iter().next() {
            favorites.push(Favorite {
                id: generate_id("FAV_", rng),
                entity_type: EntityType::UseCase,
                entity_id: first.id().to_string(),
                timestamp,
            });
        }
        favorites
    }
}

/// Entity counts of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopStatistics {
    pub rooms: usize,
    pub categories: usize,
    pub assets: usize,
    pub sensors: usize,
    pub favorites: usize,
    pub by_kind: BTreeMap<SensorKind, usize>,
    pub by_use_case: BTreeMap<UseCase, usize>,
    pub by_status: BTreeMap<SensorStatus, usize>,
}

impl ShopStatistics {
    pub fn collect(dataset: &Dataset) -> Self {
        let mut stats = Self {
            rooms: dataset.rooms.as_ref().map_or(0, Vec::len),
            categories: dataset.categories.as_ref().map_or(0, Vec::len),
            assets: dataset.assets.as_ref().map_or(0, Vec::len),
            sensors: dataset.sensors.len(),
            favorites: dataset.favorites.as_ref().map_or(0, Vec::len),
            ..Self::default()
        };
        for sensor in &dataset.sensors {
            *stats.by_kind.entry(sensor.kind).or_default() += 1;
            *stats.by_use_case.entry(sensor.use_case()).or_default() += 1;
            *stats.by_status.entry(status::evaluate(sensor)).or_default() += 1;
        }
        stats
    }
}

impl fmt::Display for ShopStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Rooms:      {}", self.rooms)?;
        writeln!(f, "  Categories: {}", self.categories)?;
        writeln!(f, "  Assets:     {}", self.assets)?;
        writeln!(f, "  Sensors:    {}", self.sensors)?;
        writeln!(f, "  Favourites: {}", self.favorites)?;

        writeln!(f, "\nSensors by type:")?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "  {kind}: {count}")?;
        }
        writeln!(f, "\nSensors by use case:")?;
        for (use_case, count) in &self.by_use_case {
            writeln!(f, "  {}: {count}", GLOBAL_REGISTRY.title(*use_case))?;
        }
        writeln!(f, "\nSensors by status:")?;
        for (status, count) in self.by_status.iter().rev() {
            writeln!(f, "  {status}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rand::{rngs::StdRng, SeedableRng};
    use shopsense_core::FixedClock;

    fn generator() -> ShopGenerator<FixedClock> {
        let config = ShopConfig { history_days: 1, ..ShopConfig::default() };
        ShopGenerator::new(config, FixedClock::new(now()))
    }

    #[test]
    fn ids_are_prefixed_hex() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = generate_id("ROOM_", &mut rng);
        assert_eq!(id.len(), 5 + 12);
        assert!(id["ROOM_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_id("ROOM_", &mut rng));
    }

    #[test]
    fn layout_matches_blueprint() {
        let dataset = generator().generate(&mut StdRng::seed_from_u64(2)).unwrap();
        let stats = ShopStatistics::collect(&dataset);

        assert_eq!(stats.rooms, 4);
        assert_eq!(stats.categories, 4);
        assert_eq!(stats.assets, 24);
        assert_eq!(stats.sensors, 35);
        assert_eq!(stats.favorites, 35 / 5 + 1);
        assert_eq!(stats.by_use_case.get(&UseCase::Openings), Some(&4));
        assert_eq!(stats.by_use_case.get(&UseCase::FillLevel), Some(&9));
        assert_eq!(stats.by_kind.get(&SensorKind::Climate), Some(&11));
        assert_eq!(stats.by_kind.get(&SensorKind::Energy), Some(&11));
    }

    #[test]
    fn sensors_point_at_existing_assets_and_rooms() {
        let dataset = generator().generate(&mut StdRng::seed_from_u64(3)).unwrap();
        let assets = dataset.assets.unwrap();
        let rooms = dataset.rooms.unwrap();

        for sensor in &dataset.sensors {
            let asset = assets.iter().find(|a| Some(&a.id) == sensor.asset_id.as_ref()).unwrap();
            assert_eq!(Some(&asset.room_id), sensor.room_id.as_ref());
            assert!(rooms.iter().any(|r| r.id == asset.room_id));
            assert_eq!(sensor.data, sensor.history.last().unwrap().data);
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(18, 30, 0).unwrap()
    }

    fn shop_with_warnings(probability: f64, seed: u64) -> Dataset {
        let config = ShopConfig {
            history_days: 1,
            warning_probability_override: Some(probability),
            walker: WalkerConfig { anomaly_probability: 0.0, ..WalkerConfig::default() },
            ..ShopConfig::default()
        };
        ShopGenerator::new(config, FixedClock::new(now()))
            .generate(&mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    /// Timestamps of energy readings whose voltage left the tolerance band
    fn voltage_excursions(sensor: &Sensor) -> Vec<NaiveDateTime> {
        let Template::Energy(template) = sensor.parameters else { return Vec::new() };
        sensor
            .history
            .iter()
            .filter(|entry| entry.data.as_energy().is_some_and(|s| !template.voltage_band().contains(s.voltage)))
            .map(|entry| entry.timestamp.naive())
            .collect()
    }

    #[test]
    fn certain_warnings_force_a_recent_fault() {
        let dataset = shop_with_warnings(1.0, 4);
        let warning_from = now() - Duration::hours(2);

        let energy: Vec<_> = dataset.sensors.iter().filter(|s| s.kind == SensorKind::Energy).collect();
        assert_eq!(energy.len(), 11);
        for sensor in energy {
            let excursions = voltage_excursions(sensor);
            assert!(!excursions.is_empty(), "{} shows no fault", sensor.id);
            assert!(excursions.iter().all(|at| *at >= warning_from));
        }
    }

    #[test]
    fn no_warnings_keep_every_reading_normal() {
        let dataset = shop_with_warnings(0.0, 4);

        for sensor in &dataset.sensors {
            assert!(voltage_excursions(sensor).is_empty(), "{} shows a fault", sensor.id);
            if let Template::Door(door) = sensor.parameters {
                for entry in &sensor.history {
                    let distance = entry.data.as_distance().map(|d| d.distance);
                    assert!(distance == Some(door.target_distance) || distance == Some(door.open_distance()));
                }
            }
        }
    }

    #[test]
    fn oversized_history_is_refused() {
        let config = ShopConfig { history_days: 200_000_000, ..ShopConfig::default() };
        let result = ShopGenerator::new(config, FixedClock::new(now())).generate(&mut StdRng::seed_from_u64(7));
        assert!(matches!(
            result,
            Err(crate::SchemaError::Simulation(SimulationError::InvalidParameter { field: "history_days", .. }))
        ));
    }

    #[test]
    fn same_seed_same_shop() {
        let a = generator().generate(&mut StdRng::seed_from_u64(5)).unwrap();
        let b = generator().generate(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn statistics_print_titles() {
        let dataset = generator().generate(&mut StdRng::seed_from_u64(6)).unwrap();
        let printed = ShopStatistics::collect(&dataset).to_string();
        assert!(printed.contains("Rooms:      4"));
        assert!(printed.contains("Room climate: 11"));
        assert!(printed.contains("distance: 13"));
    }
}
