//! Use-Case Registry
//!
//! Sensors are matched to a use case (`matchedUseCase` in the document).
//! This registry holds the human-facing definition of each one so that
//! statistics and menus can print titles instead of bare numbers.

use std::collections::BTreeMap;
use std::sync::RwLock;

use shopsense_core::{SensorKind, UseCase};

use crate::{SchemaError, SchemaResult};

/// Registry entry for one use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCaseDefinition {
    pub id: UseCase,
    pub title: String,
    /// Sensor category that serves this use case
    pub kind: SensorKind,
    pub description: String,
}

impl UseCaseDefinition {
    pub fn new(id: UseCase, title: &str, description: &str) -> Self {
        Self { id, title: title.to_string(), kind: id.kind(), description: description.to_string() }
    }
}

/// Thread-safe use-case registry
pub struct UseCaseRegistry {
    definitions: RwLock<BTreeMap<UseCase, UseCaseDefinition>>,
}

impl UseCaseRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { definitions: RwLock::new(BTreeMap::new()) }
    }

    /// Register a definition; an id may only be registered once
    pub fn register(&self, definition: UseCaseDefinition) -> SchemaResult<()> {
        if definition.kind != definition.id.kind() {
            return Err(SchemaError::Registry(format!(
                "use case {} is served by {} sensors, not {}",
                definition.id.id(),
                definition.id.kind(),
                definition.kind
            )));
        }

        let mut definitions = self
            .definitions
            .write()
            .map_err(|_| SchemaError::Registry("Lock poisoned".to_string()))?;
        if definitions.contains_key(&definition.id) {
            return Err(SchemaError::Registry(format!("use case {} already registered", definition.id.id())));
        }
        definitions.insert(definition.id, definition);
        Ok(())
    }

    /// Definition of a use case
    pub fn get(&self, id: UseCase) -> SchemaResult<UseCaseDefinition> {
        let definitions = self
            .definitions
            .read()
            .map_err(|_| SchemaError::Registry("Lock poisoned".to_string()))?;
        definitions
            .get(&id)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound(format!("use case {}", id.id())))
    }

    /// Title for display, falling back to the number
    pub fn title(&self, id: UseCase) -> String {
        self.get(id).map(|d| d.title).unwrap_or_else(|_| format!("use case {}", id.id()))
    }

    /// All definitions in id order
    pub fn all(&self) -> SchemaResult<Vec<UseCaseDefinition>> {
        let definitions = self
            .definitions
            .read()
            .map_err(|_| SchemaError::Registry("Lock poisoned".to_string()))?;
        Ok(definitions.values().cloned().collect())
    }

    /// Use cases served by a sensor category
    pub fn for_kind(&self, kind: SensorKind) -> SchemaResult<Vec<UseCaseDefinition>> {
        Ok(self.all()?.into_iter().filter(|d| d.kind == kind).collect())
    }

    /// Load the four standard use cases
    pub fn load_defaults(&self) -> SchemaResult<()> {
        self.register(UseCaseDefinition::new(
            UseCase::FillLevel,
            "Fill levels",
            "Stock level of shelves and containers measured by distance",
        ))?;
        self.register(UseCaseDefinition::new(
            UseCase::RoomClimate,
            "Room climate",
            "Temperature, humidity and CO2 in rooms and cooling units",
        ))?;
        self.register(UseCaseDefinition::new(
            UseCase::Openings,
            "Openings",
            "Doors, lids and entrances detected by distance",
        ))?;
        self.register(UseCaseDefinition::new(
            UseCase::PowerSupply,
            "Power supply",
            "Voltage and current of cooling, lighting and IT installations",
        ))
    }
}

impl Default for UseCaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    /// Global registry with the standard use cases loaded
    pub static ref GLOBAL_REGISTRY: UseCaseRegistry = {
        let registry = UseCaseRegistry::new();
        // Only fails on duplicates, which a fresh registry cannot have
        let _ = registry.load_defaults();
        registry
    };
}
