//! Persisted Dataset Layout for ShopSense
//!
//! ## Overview
//!
//! Everything ShopSense produces ends up in one JSON document, by convention
//! `data/sensorData.json`, which a dashboard reads as its fixture data:
//!
//! ```json
//! {
//!   "sensors":    [ { "id": ..., "type": "climate", "data": {...}, "history": [...],
//!                     "matchedUseCase": 2, "parameters": {...},
//!                     "assetId": "AST_...", "roomId": "ROOM_..." } ],
//!   "rooms":      [ { "name": "Sales floor", "id": "ROOM_..." } ],
//!   "assets":     [ { "name": "Dairy cooler", "id": "AST_...", "roomId": "...", "categoryId": "..." } ],
//!   "categories": [ { "name": "Chilled shelves", "id": "CAT_..." } ],
//!   "favorites":  [ { "id": "FAV_...", "entityType": "sensor", "entityId": "...", "timestamp": "..." } ]
//! }
//! ```
//!
//! Only `sensors` is required. The sensor-list extender works on documents
//! that contain nothing else, and any top-level key this crate does not know
//! about is carried through a load/save cycle untouched.
//!
//! ## Modules
//!
//! - [`storage`]: loading and atomically saving the document
//! - [`registry`]: the catalog of use cases sensors are matched to
//! - [`shop`]: the full shop generator (rooms, assets, sensors, favourites)
//! - [`extender`]: appending random sensors to an existing list
//!
//! ## Usage Example
//!
//! ```rust
//! use shopsense_schemas::Dataset;
//!
//! let raw = r#"{"sensors": [], "dashboardLayout": {"columns": 3}}"#;
//! let dataset: Dataset = serde_json::from_str(raw)?;
//! assert!(dataset.sensors.is_empty());
//! assert!(dataset.rooms.is_none());
//!
//! let written = serde_json::to_value(&dataset)?;
//! assert_eq!(written["dashboardLayout"]["columns"], 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use shopsense_core::{Sensor, SimulationError, Timestamp};

pub mod extender;
pub mod registry;
pub mod shop;
pub mod storage;

pub use extender::{ExtenderConfig, SensorListExtender};
pub use registry::{UseCaseDefinition, UseCaseRegistry, GLOBAL_REGISTRY};
pub use shop::{ShopConfig, ShopGenerator, ShopStatistics};
pub use storage::DataFile;

/// Result alias for dataset operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Dataset-related errors
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// The whole persisted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<Room>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<Asset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<Favorite>>,
    /// Unknown top-level keys, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    /// Dataset holding only a sensor list
    pub fn with_sensors(sensors: Vec<Sensor>) -> Self {
        Self { sensors, ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub id: String,
}

/// Installation inside a room, grouped by category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    pub id: String,
    pub room_id: String,
    pub category_id: String,
}

/// What a favourite points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Sensor,
    UseCase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub entity_type: EntityType,
    /// Sensor id, or the use-case number as a string
    pub entity_id: String,
    pub timestamp: Timestamp,
}
