//! System configuration parameters
//!
//! All tunable parameters for the RoomStat thermostat.  The original
//! hardware prototype hard-coded most of these; here they are explicit
//! configuration so test rigs and different relay/compressor combinations
//! can adjust them without a firmware rebuild.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatConfig {
    // --- Set point ---
    /// Set point at power-on (degrees Fahrenheit)
    pub setpoint_default_f: i16,
    /// Lowest accepted set point; decrements below this clamp silently
    pub setpoint_min_f: i16,
    /// Highest accepted set point; increments above this clamp silently
    pub setpoint_max_f: i16,

    // --- Control ---
    /// Half-width of the no-change band around the set point (degrees F)
    pub hysteresis_f: f32,
    /// Minimum time between physical actuator changes (seconds)
    pub min_dwell_secs: u16,

    // --- Buttons ---
    /// Raw edges closer together than this are treated as switch bounce (ms)
    pub debounce_window_ms: u32,

    // --- Timing ---
    /// Control tick period — button drain cadence (milliseconds)
    pub control_tick_ms: u32,
    /// Sensor sample / decision interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Status report interval (seconds)
    pub report_interval_secs: u32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            // Set point
            setpoint_default_f: 72,
            setpoint_min_f: 50,
            setpoint_max_f: 90,

            // Control
            hysteresis_f: 1.0,
            min_dwell_secs: 60,

            // Buttons
            debounce_window_ms: 200,

            // Timing
            control_tick_ms: 100,     // 10 Hz button drain
            sample_interval_ms: 1000, // 1 Hz sample + decide
            report_interval_secs: 1,  // 1 Hz collector record
        }
    }
}

impl ThermostatConfig {
    /// Control ticks between sensor samples (at least 1).
    pub fn sample_every_ticks(&self) -> u32 {
        (self.sample_interval_ms / self.control_tick_ms).max(1)
    }

    /// Minimum dwell expressed in milliseconds, as the actuator driver
    /// consumes it.
    pub fn min_dwell_ms(&self) -> u32 {
        u32::from(self.min_dwell_secs) * 1000
    }
}
