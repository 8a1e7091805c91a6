//! Loading and saving the dataset file
//!
//! A missing file is not an error: it reads as an empty dataset so the
//! generators can start from scratch. Saving goes through a sibling
//! temporary file that is renamed into place, so a crash mid-write never
//! leaves a truncated document behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::{Dataset, SchemaError, SchemaResult};

/// Conventional location, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/sensorData.json";

/// Handle on a dataset file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    path: PathBuf,
}

impl Default for DataFile {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the dataset; a missing file yields an empty one
    pub fn load(&self) -> SchemaResult<Dataset> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} not found, starting with an empty dataset", self.path.display());
                return Ok(Dataset::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let dataset: Dataset = serde_json::from_reader(BufReader::new(file))?;
        info!("loaded {} sensors from {}", dataset.sensors.len(), self.path.display());
        Ok(dataset)
    }

    /// Write the dataset as pretty JSON, creating parent directories
    pub fn save(&self, dataset: &Dataset) -> SchemaResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let staging = self.staging_path();
        let result = self.write_to(&staging, dataset).and_then(|()| {
            fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))
        });
        if result.is_err() {
            // Best effort; the original file is still intact
            let _ = fs::remove_file(&staging);
        }
        result?;

        info!("saved {} sensors to {}", dataset.sensors.len(), self.path.display());
        Ok(())
    }

    fn write_to(&self, staging: &Path, dataset: &Dataset) -> SchemaResult<()> {
        let file = File::create(staging).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, dataset)?;
        writer.flush().map_err(|e| self.io_error(e))?;
        writer
            .into_inner()
            .map_err(|e| self.io_error(e.into_error()))?
            .sync_all()
            .map_err(|e| self.io_error(e))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "dataset".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> SchemaError {
        SchemaError::Io { path: self.path.display().to_string(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shopsense_core::{templates::DEFAULT_DOOR, HistoryEntry, Sample, Sensor, SensorId, Timestamp};

    fn door_sensor() -> Sensor {
        let at = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let entry = HistoryEntry {
            timestamp: Timestamp::with_zulu_suffix(at),
            data: Sample::from(shopsense_core::DistanceSample::from_raw(5.0)),
        };
        Sensor::new(SensorId::Numeric(1), DEFAULT_DOOR.template, vec![entry]).unwrap()
    }

    #[test]
    fn missing_file_is_an_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let file = DataFile::new(dir.path().join("absent.json"));
        assert_eq!(file.load().unwrap(), Dataset::default());
    }

    #[test]
    fn save_creates_directories_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let file = DataFile::new(dir.path().join("nested/data/sensorData.json"));

        let mut dataset = Dataset::with_sensors(vec![door_sensor()]);
        dataset.extra.insert("theme".into(), serde_json::json!("dark"));
        file.save(&dataset).unwrap();

        assert!(!dir.path().join("nested/data/sensorData.json.tmp").exists());
        let raw = fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("\"timestamp\": \"2024-06-03T12:00:00Z\""));
        assert_eq!(file.load().unwrap(), dataset);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(DataFile::new(path).load(), Err(SchemaError::Json(_))));
    }
}
