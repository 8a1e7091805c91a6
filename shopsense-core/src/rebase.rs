//! Timestamp rebasing
//!
//! Shifts every history in a dataset so that its newest entry lands on
//! "now" while the oldest keeps its distance from it. Each timestamp `t` is
//! mapped proportionally:
//!
//! ```text
//! progress = (t - oldest) / (newest - oldest)
//! t'       = (now - timespan) + progress × timespan
//! ```
//!
//! The map is monotonic, so order and spacing ratios survive. All checks run
//! before anything is touched: on error the sensors are left exactly as they
//! were. Rewritten timestamps carry the trailing `Z` of the persisted format
//! (local time, not UTC).

use chrono::{Duration, NaiveDateTime};
use log::info;

use crate::errors::{SimulationError, SimulationResult};
use crate::sensor::Sensor;
use crate::time::Timestamp;

/// What a rebase changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebaseSummary {
    pub sensors: usize,
    pub entries: usize,
    /// Oldest timestamp before rebasing
    pub oldest: NaiveDateTime,
    /// Newest timestamp before rebasing
    pub newest: NaiveDateTime,
    /// New position of the oldest entry
    pub start: NaiveDateTime,
    /// New position of the newest entry
    pub end: NaiveDateTime,
}

impl RebaseSummary {
    /// Amount every entry moved
    pub fn shift(&self) -> Duration {
        self.end - self.newest
    }
}

/// Rebase all sensor histories to end at `now`
pub fn rebase(sensors: &mut [Sensor], now: NaiveDateTime) -> SimulationResult<RebaseSummary> {
    let (oldest, newest) = extent(sensors)?;
    let timespan = newest - oldest;
    let span_us = micros(timespan, oldest, newest)?;
    if span_us == 0 {
        return Err(SimulationError::ZeroTimespan);
    }
    let start = now - timespan;

    let mut entries = 0;
    for sensor in sensors.iter_mut() {
        sensor.history.sort_by_key(|entry| entry.timestamp);
        for entry in sensor.history.iter_mut() {
            let offset_us = micros(entry.timestamp.naive() - oldest, oldest, newest)?;
            let moved = start + Duration::microseconds(scale(offset_us, span_us, span_us));
            entry.timestamp = Timestamp::with_zulu_suffix(moved);
        }
        entries += sensor.history.len();
        sensor.refresh_current()?;
    }

    let summary = RebaseSummary { sensors: sensors.len(), entries, oldest, newest, start, end: now };
    info!(
        "rebased {} entries of {} sensors from [{}, {}] to [{}, {}]",
        summary.entries, summary.sensors, oldest, newest, start, now
    );
    Ok(summary)
}

/// Oldest and newest timestamp across all histories
fn extent(sensors: &[Sensor]) -> SimulationResult<(NaiveDateTime, NaiveDateTime)> {
    if sensors.is_empty() {
        return Err(SimulationError::NoSensors);
    }

    let mut bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for sensor in sensors {
        if sensor.history.is_empty() {
            return Err(SimulationError::EmptyHistory { sensor: sensor.id.to_string() });
        }
        for entry in &sensor.history {
            let t = entry.timestamp.naive();
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
                None => (t, t),
            });
        }
    }
    bounds.ok_or(SimulationError::NoSensors)
}

/// `offset × to_span / from_span`, rounded to the nearest microsecond
fn scale(offset_us: i64, from_span_us: i64, to_span_us: i64) -> i64 {
    let numerator = offset_us as i128 * to_span_us as i128;
    let denominator = from_span_us as i128;
    let half = denominator / 2;
    ((numerator + half).div_euclid(denominator)) as i64
}

fn micros(delta: Duration, oldest: NaiveDateTime, newest: NaiveDateTime) -> SimulationResult<i64> {
    delta
        .num_microseconds()
        .ok_or_else(|| SimulationError::InvalidRange { start: oldest.to_string(), end: newest.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{DistanceSample, Sample};
    use crate::sensor::{HistoryEntry, SensorId};
    use crate::templates::DEFAULT_DOOR;
    use chrono::NaiveDate;

    fn t(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(hour, min, 0).unwrap()
    }

    fn door(id: u64, stamps: &[NaiveDateTime]) -> Sensor {
        let history = stamps
            .iter()
            .enumerate()
            .map(|(i, at)| HistoryEntry {
                timestamp: Timestamp::local(*at),
                data: DistanceSample::from_raw(i as f64).into(),
            })
            .collect();
        Sensor::new(SensorId::Numeric(id), DEFAULT_DOOR.template, history).unwrap()
    }

    #[test]
    fn one_hour_span_lands_before_now() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let mut sensors = vec![door(1, &[t(8, 0), t(9, 0)])];
        let summary = rebase(&mut sensors, now).unwrap();

        let stamps: Vec<_> = sensors[0].history.iter().map(|e| e.timestamp.naive()).collect();
        assert_eq!(stamps, vec![now - Duration::hours(1), now]);
        assert!(sensors[0].history.iter().all(|e| e.timestamp.has_zulu_suffix()));
        assert_eq!(summary.shift(), now - t(9, 0));
    }

    #[test]
    fn unsorted_history_is_sorted_and_current_refreshed() {
        let now = t(18, 0);
        let mut sensors = vec![door(1, &[t(10, 0), t(8, 0), t(9, 0)])];
        rebase(&mut sensors, now).unwrap();

        let sensor = &sensors[0];
        assert_eq!(sensor.history.last().map(|e| e.timestamp.naive()), Some(now));
        // Entry created at 10:00 carried distance 0.0
        assert_eq!(sensor.data, Sample::from(DistanceSample::from_raw(0.0)));
    }

    #[test]
    fn failures_leave_sensors_untouched() {
        let now = t(18, 0);
        let mut sensors = vec![door(1, &[t(8, 0)]), door(2, &[t(8, 0)])];
        let before = sensors.clone();
        assert_eq!(rebase(&mut sensors, now), Err(SimulationError::ZeroTimespan));
        assert_eq!(sensors, before);

        let mut empty = door(3, &[t(8, 0)]);
        empty.history.clear();
        let mut sensors = vec![door(1, &[t(8, 0), t(9, 0)]), empty];
        let before = sensors.clone();
        assert_eq!(
            rebase(&mut sensors, now),
            Err(SimulationError::EmptyHistory { sensor: "3".into() })
        );
        assert_eq!(sensors, before);

        assert_eq!(rebase(&mut [], now), Err(SimulationError::NoSensors));
    }

    #[test]
    fn scale_rounds_to_nearest() {
        assert_eq!(scale(1, 3, 2), 1);
        assert_eq!(scale(5, 10, 10), 5);
        assert_eq!(scale(0, 7, 1_000), 0);
    }
}
