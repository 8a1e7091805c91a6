//! Sensor records and their classification
//!
//! A [`Sensor`] is what ends up in the persisted JSON document: identity,
//! category tag, the template it was generated from, the full history, and a
//! cached copy of the latest sample.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{SimulationError, SimulationResult};
use crate::samples::Sample;
use crate::templates::Template;
use crate::time::Timestamp;

/// Sensor category as persisted in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Climate,
    Energy,
    Distance,
}

impl SensorKind {
    /// All categories in catalog order
    pub const ALL: [SensorKind; 3] = [SensorKind::Climate, SensorKind::Distance, SensorKind::Energy];

    /// Persisted name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorKind::Climate => "climate",
            SensorKind::Energy => "energy",
            SensorKind::Distance => "distance",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Use case a sensor is matched to, persisted as `matchedUseCase`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum UseCase {
    /// Distance sensor measuring shelf or container fill level
    FillLevel = 1,
    /// Climate sensor
    RoomClimate = 2,
    /// Distance sensor on a door or lid
    Openings = 3,
    /// Energy sensor
    PowerSupply = 4,
}

impl UseCase {
    pub const ALL: [UseCase; 4] = [
        UseCase::FillLevel,
        UseCase::RoomClimate,
        UseCase::Openings,
        UseCase::PowerSupply,
    ];

    /// Numeric discriminator used in the JSON document
    pub const fn id(&self) -> u8 {
        *self as u8
    }

    /// Sensor category serving this use case
    pub const fn kind(&self) -> SensorKind {
        match self {
            UseCase::FillLevel | UseCase::Openings => SensorKind::Distance,
            UseCase::RoomClimate => SensorKind::Climate,
            UseCase::PowerSupply => SensorKind::Energy,
        }
    }
}

impl TryFrom<u8> for UseCase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UseCase::FillLevel),
            2 => Ok(UseCase::RoomClimate),
            3 => Ok(UseCase::Openings),
            4 => Ok(UseCase::PowerSupply),
            other => Err(format!("unknown use case {other}")),
        }
    }
}

impl From<UseCase> for u8 {
    fn from(use_case: UseCase) -> Self {
        use_case.id()
    }
}

/// Sensor identity
///
/// The sensor-list extender numbers sensors, the shop generator uses prefixed
/// random hex strings. Both shapes appear in the same document format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorId::Numeric(n) => write!(f, "{n}"),
            SensorId::Text(s) => f.write_str(s),
        }
    }
}

/// One timestamped sample in a history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: Timestamp,
    pub data: Sample,
}

/// Persisted sensor record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: SensorId,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    /// Latest sample, equal to the last history entry
    pub data: Sample,
    pub history: Vec<HistoryEntry>,
    pub matched_use_case: Option<UseCase>,
    pub parameters: Template,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

impl Sensor {
    /// Build a sensor from a generated history
    ///
    /// The current sample is taken from the last entry, so the history must
    /// not be empty.
    pub fn new(id: SensorId, template: Template, history: Vec<HistoryEntry>) -> SimulationResult<Self> {
        let data = history
            .last()
            .map(|entry| entry.data)
            .ok_or_else(|| SimulationError::EmptyHistory { sensor: id.to_string() })?;

        Ok(Self {
            id,
            kind: template.kind(),
            data,
            history,
            matched_use_case: Some(template.use_case()),
            parameters: template,
            asset_id: None,
            room_id: None,
        })
    }

    /// Attach the sensor to an asset in a room
    pub fn with_location(mut self, asset_id: impl Into<String>, room_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self.room_id = Some(room_id.into());
        self
    }

    /// Refresh the cached current sample from the last history entry
    pub fn refresh_current(&mut self) -> SimulationResult<()> {
        let last = self
            .history
            .last()
            .ok_or_else(|| SimulationError::EmptyHistory { sensor: self.id.to_string() })?;
        self.data = last.data;
        Ok(())
    }

    /// Use case, falling back to the one implied by the template
    pub fn use_case(&self) -> UseCase {
        self.matched_use_case.unwrap_or_else(|| self.parameters.use_case())
    }
}
