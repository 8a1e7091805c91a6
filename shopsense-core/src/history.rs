//! History Walker
//!
//! ## Overview
//!
//! Walks simulated time from a start instant towards an end instant (usually
//! "now"), producing one sample per interval: 5 minutes for door sensors, 15
//! minutes for everything else. The covered range is half-open, so an hour
//! of climate data is four entries.
//!
//! ## State Machine
//!
//! ```text
//!            Bernoulli(p) per step
//!   NORMAL ─────────────────────────▶ ANOMALOUS(until)
//!      ▲                                   │
//!      └───────── at >= until ─────────────┘
//! ```
//!
//! On entering `ANOMALOUS` the walker draws a duration uniformly from
//! `[min_anomaly_minutes, max_anomaly_minutes]` and a fault from the catalog
//! of the sensor's use case. The step that ends an anomaly does not roll for
//! a new one. At most one anomaly is active at any instant.
//!
//! Each step hands the previous sample and the active fault (if any) to the
//! template's generator; the walk is a fold over the time steps.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use rand::{rngs::StdRng, SeedableRng};
//! use shopsense_core::history::{HistoryWalker, WalkerConfig};
//! use shopsense_core::templates::DEFAULT_DOOR;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let walker = HistoryWalker::new(WalkerConfig { anomaly_probability: 0.0, ..WalkerConfig::default() });
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let outcome = walker.walk(&DEFAULT_DOOR.template, start, start + Duration::minutes(25), &mut rng)?;
//! assert_eq!(outcome.history.len(), 5);
//! assert!(outcome.anomalies.is_empty());
//! # Ok::<(), shopsense_core::SimulationError>(())
//! ```

use std::iter::successors;

use chrono::{Duration, NaiveDateTime};
use log::debug;
use rand::Rng;

use crate::anomaly::Anomaly;
use crate::constants::sensors::ANOMALY_TRIGGER_PROBABILITY;
use crate::constants::time::{ANOMALY_MAX_MINUTES, ANOMALY_MIN_MINUTES};
use crate::errors::{SimulationError, SimulationResult};
use crate::samples::Sample;
use crate::sensor::HistoryEntry;
use crate::templates::Template;
use crate::time::Timestamp;
use crate::validators::{check_probability, validate_template, Validate};

/// Walker tuning
#[derive(Debug, Clone, PartialEq)]
pub struct WalkerConfig {
    /// Chance per step of a fault starting
    pub anomaly_probability: f64,
    pub min_anomaly_minutes: i64,
    pub max_anomaly_minutes: i64,
    /// Start one fault at the first step at or after this instant,
    /// independent of `anomaly_probability`
    pub forced_anomaly_from: Option<NaiveDateTime>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            anomaly_probability: ANOMALY_TRIGGER_PROBABILITY,
            min_anomaly_minutes: ANOMALY_MIN_MINUTES,
            max_anomaly_minutes: ANOMALY_MAX_MINUTES,
            forced_anomaly_from: None,
        }
    }
}

impl Validate for WalkerConfig {
    fn validate(&self) -> SimulationResult<()> {
        check_probability("anomaly_probability", self.anomaly_probability)?;
        if self.min_anomaly_minutes <= 0 {
            return Err(SimulationError::InvalidParameter {
                field: "min_anomaly_minutes",
                reason: "must be greater than zero",
            });
        }
        if self.max_anomaly_minutes < self.min_anomaly_minutes {
            return Err(SimulationError::InvalidParameter {
                field: "max_anomaly_minutes",
                reason: "must not be below min_anomaly_minutes",
            });
        }
        Ok(())
    }
}

/// One fault episode as scheduled when it started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyWindow {
    pub anomaly: Anomaly,
    pub start: NaiveDateTime,
    /// Scheduled end; the fault clears at the first step at or after it
    pub end: NaiveDateTime,
}

/// Result of a walk
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub history: Vec<HistoryEntry>,
    pub anomalies: Vec<AnomalyWindow>,
}

impl WalkOutcome {
    /// Latest sample, if any step was taken
    pub fn last_sample(&self) -> Option<&Sample> {
        self.history.last().map(|entry| &entry.data)
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Normal,
    Anomalous { anomaly: Anomaly, until: NaiveDateTime },
}

struct WalkState {
    phase: Phase,
    previous: Option<Sample>,
    forced_from: Option<NaiveDateTime>,
    outcome: WalkOutcome,
}

/// Start of a history that covers the `days` before `now`
///
/// At least one day; lengths the calendar cannot represent are refused
/// rather than wrapped.
pub fn history_start(now: NaiveDateTime, days: i64) -> SimulationResult<NaiveDateTime> {
    if days < 1 {
        return Err(SimulationError::InvalidParameter {
            field: "history_days",
            reason: "must be at least one day",
        });
    }
    Duration::try_days(days)
        .and_then(|length| now.checked_sub_signed(length))
        .ok_or(SimulationError::InvalidParameter {
            field: "history_days",
            reason: "reaches beyond the representable calendar",
        })
}

/// Generates sensor histories over simulated time
#[derive(Debug, Clone, Default)]
pub struct HistoryWalker {
    config: WalkerConfig,
}

impl HistoryWalker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Generate the history of `template` over `[start, end)`
    pub fn walk<R: Rng + ?Sized>(
        &self,
        template: &Template,
        start: NaiveDateTime,
        end: NaiveDateTime,
        rng: &mut R,
    ) -> SimulationResult<WalkOutcome> {
        validate_template(template)?;
        self.config.validate()?;
        if end < start {
            return Err(SimulationError::InvalidRange { start: start.to_string(), end: end.to_string() });
        }

        let interval = template.interval();
        let initial = WalkState {
            phase: Phase::Normal,
            previous: None,
            forced_from: self.config.forced_anomaly_from,
            outcome: WalkOutcome::default(),
        };

        let state = successors(Some(start), |at| Some(*at + interval))
            .take_while(|at| *at < end)
            .fold(initial, |state, at| self.step(template, state, at, &mut *rng));

        Ok(state.outcome)
    }

    fn step<R: Rng + ?Sized>(&self, template: &Template, mut state: WalkState, at: NaiveDateTime, rng: &mut R) -> WalkState {
        let phase = state.phase;
        state.phase = match phase {
            Phase::Normal => {
                if self.should_trigger(&mut state, at, rng) {
                    let minutes = rng.gen_range(self.config.min_anomaly_minutes..=self.config.max_anomaly_minutes);
                    let anomaly = Anomaly::random_for(template.use_case(), rng);
                    let until = at + Duration::minutes(minutes);
                    debug!("anomaly {} started at {} for {} min", anomaly, at, minutes);
                    state.outcome.anomalies.push(AnomalyWindow { anomaly, start: at, end: until });
                    Phase::Anomalous { anomaly, until }
                } else {
                    Phase::Normal
                }
            }
            Phase::Anomalous { anomaly, until } if at >= until => {
                debug!("anomaly {} ended at {}", anomaly, at);
                Phase::Normal
            }
            anomalous => anomalous,
        };

        let active = match &state.phase {
            Phase::Anomalous { anomaly, .. } => Some(anomaly),
            Phase::Normal => None,
        };
        let sample = template.next_sample(at, state.previous.as_ref(), active, rng);

        state.outcome.history.push(HistoryEntry { timestamp: Timestamp::local(at), data: sample });
        state.previous = Some(sample);
        state
    }

    fn should_trigger<R: Rng + ?Sized>(&self, state: &mut WalkState, at: NaiveDateTime, rng: &mut R) -> bool {
        match state.forced_from {
            Some(from) if at >= from => {
                state.forced_from = None;
                true
            }
            _ => rng.gen::<f64>() < self.config.anomaly_probability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{CLIMATE_TEMPLATES, DEFAULT_FILL};
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn quiet() -> HistoryWalker {
        HistoryWalker::new(WalkerConfig { anomaly_probability: 0.0, ..WalkerConfig::default() })
    }

    #[test]
    fn one_hour_of_climate_is_four_entries() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = quiet()
            .walk(&CLIMATE_TEMPLATES[0].template, start(), start() + Duration::hours(1), &mut rng)
            .unwrap();

        let stamps: Vec<_> = outcome.history.iter().map(|e| e.timestamp.naive()).collect();
        assert_eq!(
            stamps,
            vec![start(), start() + Duration::minutes(15), start() + Duration::minutes(30), start() + Duration::minutes(45)]
        );
    }

    #[test]
    fn empty_range_yields_empty_history() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = quiet().walk(&DEFAULT_FILL.template, start(), start(), &mut rng).unwrap();
        assert!(outcome.history.is_empty());
        assert!(outcome.last_sample().is_none());
    }

    #[test]
    fn reversed_range_is_refused() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = quiet().walk(&DEFAULT_FILL.template, start(), start() - Duration::minutes(1), &mut rng);
        assert!(matches!(result, Err(SimulationError::InvalidRange { .. })));
    }

    #[test]
    fn history_start_is_checked() {
        assert_eq!(history_start(start(), 7), Ok(start() - Duration::days(7)));
        assert!(matches!(
            history_start(start(), 0),
            Err(SimulationError::InvalidParameter { field: "history_days", .. })
        ));
        assert!(matches!(
            history_start(start(), 200_000_000),
            Err(SimulationError::InvalidParameter { field: "history_days", .. })
        ));
        assert!(history_start(start(), i64::MAX).is_err());
    }

    #[test]
    fn invalid_probability_is_refused() {
        let walker = HistoryWalker::new(WalkerConfig { anomaly_probability: 1.5, ..WalkerConfig::default() });
        let mut rng = StdRng::seed_from_u64(1);
        let result = walker.walk(&DEFAULT_FILL.template, start(), start() + Duration::hours(1), &mut rng);
        assert!(matches!(result, Err(SimulationError::InvalidParameter { field: "anomaly_probability", .. })));
    }

    #[test]
    fn forced_anomaly_starts_once() {
        let from = start() + Duration::hours(2);
        let walker = HistoryWalker::new(WalkerConfig {
            anomaly_probability: 0.0,
            forced_anomaly_from: Some(from),
            ..WalkerConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(9);
        let outcome = walker
            .walk(&CLIMATE_TEMPLATES[2].template, start(), start() + Duration::hours(8), &mut rng)
            .unwrap();

        assert_eq!(outcome.anomalies.len(), 1);
        let window = outcome.anomalies[0];
        assert_eq!(window.start, from);
        let minutes = (window.end - window.start).num_minutes();
        assert!((30..=120).contains(&minutes));
        assert!(matches!(window.anomaly, Anomaly::Climate(_)));
    }

    #[test]
    fn windows_never_overlap() {
        let walker = HistoryWalker::new(WalkerConfig { anomaly_probability: 0.2, ..WalkerConfig::default() });
        let mut rng = StdRng::seed_from_u64(33);
        let outcome = walker
            .walk(&CLIMATE_TEMPLATES[0].template, start(), start() + Duration::days(3), &mut rng)
            .unwrap();

        assert!(outcome.anomalies.len() > 1);
        for pair in outcome.anomalies.windows(2) {
            assert!(pair[1].start >= pair[0].end);
        }
    }
}
