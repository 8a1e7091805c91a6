//! Sensor Simulation Parameters
//!
//! Step sizes, probabilities and anomaly factor ranges for the random-walk
//! generators. Every range is inclusive on both ends.

// ===== SHARED =====

/// Normal readings stay within `target ± TOLERANCE_BAND_FACTOR × tolerance`.
pub const TOLERANCE_BAND_FACTOR: f64 = 3.0;

/// Per-step probability that a normal history turns anomalous.
///
/// One trigger per thousand steps is roughly one fault per ten days of
/// quarter-hour samples.
pub const ANOMALY_TRIGGER_PROBABILITY: f64 = 0.001;

// ===== CLIMATE =====

/// Maximum temperature step (°C).
pub const TEMP_STEP_C: f64 = 0.3;

/// Maximum humidity step (%RH).
pub const HUMIDITY_STEP_PCT: f64 = 2.0;

/// Maximum CO2 step (ppm).
pub const CO2_STEP_PPM: f64 = 30.0;

/// Extra CO2 at noon during business hours (ppm), scaled by the day factor.
///
/// Models customers breathing in the sales room.
pub const CO2_OCCUPANCY_PPM: f64 = 100.0;

/// Humidity above which mold risk is flagged (%RH, exclusive).
pub const MOLD_HUMIDITY_PCT: f64 = 65.0;

/// Temperature above which mold risk is flagged (°C, exclusive).
pub const MOLD_TEMPERATURE_C: f64 = 22.0;

// ===== ENERGY =====

/// Maximum voltage step (V).
pub const VOLTAGE_STEP_V: f64 = 0.5;

/// Maximum current step before load scaling (A).
pub const CURRENT_STEP_A: f64 = 0.2;

/// Current step multiplier during business hours.
pub const BUSINESS_LOAD_FACTOR: f64 = 1.5;

/// Current step multiplier outside business hours.
pub const IDLE_LOAD_FACTOR: f64 = 0.8;

// ===== FILL LEVEL =====

/// Fraction of the range that is already consumed on a fresh sensor.
///
/// Fresh sensors start 70% full.
pub const FILL_START_CONSUMED: f64 = 0.3;

/// Per-step refill probability during business hours.
pub const REFILL_PROBABILITY: f64 = 0.05;

/// Consumption per step during business hours (distance units).
pub const BUSINESS_CONSUMPTION: (f64, f64) = (0.1, 0.3);

/// Consumption per step outside business hours (distance units).
pub const IDLE_CONSUMPTION: (f64, f64) = (0.0, 0.1);

// ===== DOOR =====

/// Per-step probability that a closed door opens during business hours.
pub const DOOR_OPEN_PROBABILITY: f64 = 0.1;

/// Per-step probability that an open door closes during business hours.
pub const DOOR_CLOSE_PROBABILITY: f64 = 0.8;

/// Per-step probability that a door is closed outside business hours.
pub const DOOR_NIGHT_CLOSE_PROBABILITY: f64 = 0.95;

/// Open doors read `target + DOOR_OPEN_TOLERANCE_FACTOR × tolerance`.
pub const DOOR_OPEN_TOLERANCE_FACTOR: f64 = 3.0;

// ===== ANOMALY TRANSFORMS =====

/// Cooling failure: added temperature (°C) and humidity (%RH).
pub const COOLING_FAILURE_TEMP_C: (f64, f64) = (5.0, 10.0);
pub const COOLING_FAILURE_HUMIDITY_PCT: (f64, f64) = (10.0, 20.0);

/// Ventilation failure: added temperature, humidity and CO2.
pub const VENTILATION_FAILURE_TEMP_C: (f64, f64) = (2.0, 4.0);
pub const VENTILATION_FAILURE_HUMIDITY_PCT: (f64, f64) = (15.0, 25.0);
pub const VENTILATION_FAILURE_CO2_PPM: (f64, f64) = (300.0, 500.0);

/// Sensor malfunction / loose sensor: multiplicative scatter.
pub const MALFUNCTION_FACTOR: (f64, f64) = (0.5, 1.5);

/// Voltage spike: voltage multiplier.
pub const VOLTAGE_SPIKE_FACTOR: (f64, f64) = (1.2, 1.4);

/// Power outage: multiplier for both voltage and current.
pub const POWER_OUTAGE_FACTOR: (f64, f64) = (0.0, 0.2);

/// Overload: voltage sag and current surge multipliers.
pub const OVERLOAD_VOLTAGE_FACTOR: (f64, f64) = (0.8, 0.9);
pub const OVERLOAD_CURRENT_FACTOR: (f64, f64) = (1.5, 2.0);

/// Fill sensor error: distance multiplier.
pub const FILL_SENSOR_ERROR_FACTOR: (f64, f64) = (1.5, 2.0);

/// Sudden emptying: distance multiplier.
pub const SUDDEN_EMPTY_FACTOR: (f64, f64) = (0.9, 1.0);

/// Door stuck: added distance.
pub const DOOR_STUCK_OFFSET: (f64, f64) = (5.0, 10.0);
