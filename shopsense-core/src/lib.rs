//! Core simulation engine for ShopSense
//!
//! Generates realistic, reproducible sensor histories for a retail shop:
//! room climate, power supply, shelf fill levels and door openings.
//!
//! Key properties:
//! - Every random draw goes through an injected `Rng`, so a seed reproduces
//!   a dataset exactly
//! - Histories are bounded random walks anchored to a template, with rare
//!   time-limited faults
//! - Rebasing shifts a whole dataset so it ends "now"
//!
//! ```
//! use chrono::{Duration, NaiveDate};
//! use rand::{rngs::StdRng, SeedableRng};
//! use shopsense_core::{HistoryWalker, Sensor, SensorId, WalkerConfig};
//! use shopsense_core::templates::lookup;
//!
//! let end = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(18, 0, 0).unwrap();
//! let template = lookup("bakery").unwrap().template;
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let outcome = HistoryWalker::new(WalkerConfig::default())
//!     .walk(&template, end - Duration::days(1), end, &mut rng)?;
//! let sensor = Sensor::new(SensorId::Numeric(1), template, outcome.history)?;
//! assert_eq!(sensor.history.len(), 96);
//! # Ok::<(), shopsense_core::SimulationError>(())
//! ```

#![deny(unsafe_code)]

pub mod anomaly;
pub mod constants;
pub mod errors;
pub mod generators;
pub mod history;
pub mod rebase;
pub mod samples;
pub mod sensor;
pub mod status;
pub mod templates;
pub mod time;
pub mod validators;

// Public API
pub use anomaly::{select_anomaly, Anomaly};
pub use errors::{SimulationError, SimulationResult};
pub use generators::SampleGenerator;
pub use history::{history_start, AnomalyWindow, HistoryWalker, WalkOutcome, WalkerConfig};
pub use rebase::{rebase, RebaseSummary};
pub use samples::{ClimateSample, DistanceSample, EnergySample, Sample};
pub use sensor::{HistoryEntry, Sensor, SensorId, SensorKind, UseCase};
pub use status::{evaluate, overall_status, SensorStatus};
pub use templates::{NamedTemplate, Template};
pub use time::{Clock, FixedClock, SystemClock, Timestamp};
pub use validators::{validate_template, Validate};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
