//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It carries the latest climate reading, the set point copied
//! from the store at the start of the tick, timing counters, and the
//! configuration.

use crate::config::ThermostatConfig;

// ---------------------------------------------------------------------------
// Climate reading (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// A point-in-time sample from the climate sensor.
///
/// Captured fresh each sample tick and immutable once captured.  The only
/// retention is the service's "last valid reading", reused (and flagged
/// stale) while the sensor is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    /// Ambient temperature in degrees Fahrenheit.
    pub temperature_f: f32,
    /// Relative humidity, 0–100 %.
    pub humidity_pct: f32,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Inputs --
    /// Latest climate reading (last valid one while the sensor is down).
    pub reading: Reading,
    /// True while `reading` is a reused value from before a sensor outage.
    pub reading_stale: bool,
    /// Set point snapshot, copied from the store before each FSM tick.
    pub setpoint_f: i16,

    // -- Configuration --
    /// System configuration (tunable parameters).
    pub config: ThermostatConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: ThermostatConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            reading: Reading::default(),
            reading_stale: false,
            setpoint_f: config.setpoint_default_f,
            config,
        }
    }
}
