//! Outbound application events.
//!
//! The [`ThermostatService`](super::service::ThermostatService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them — today they go to the
//! serial log.

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// An accepted button press moved the set point.
    SetPointChanged { setpoint_f: i16 },

    /// The climate sensor stopped answering; readings are now reused and
    /// flagged stale.  Emitted once per outage, not per failed sample.
    SensorLost,

    /// The climate sensor answered again after an outage.
    SensorRecovered,

    /// A status snapshot was built for the report cadence.
    Report(StatusSnapshot),
}

/// A point-in-time status record for the collector.
///
/// Constructed fresh for each report tick; read-only once built; no
/// identity beyond the record it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    /// Ambient temperature (°F) — last valid reading during an outage.
    pub temperature_f: f32,
    /// Relative humidity (0–100 %).
    pub humidity_pct: f32,
    /// Current set point (°F).
    pub setpoint_f: i16,
    /// Decision currently driven on the outputs (dwell included).
    pub decision: StateId,
    /// True while the carried reading predates a sensor outage.
    pub stale: bool,
    /// Monotonic uptime timestamp (ms).
    pub timestamp_ms: u64,
}
