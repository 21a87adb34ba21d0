//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ThermostatService (domain)
//! ```
//!
//! Driven adapters (the climate sensor, the relay driver, the report
//! channel, event sinks) implement these traits.  The
//! [`ThermostatService`](super::service::ThermostatService) consumes them
//! via generics, so the domain core never touches hardware directly.

use crate::error::{SensorError, TransportError};
use crate::fsm::StateId;
use crate::fsm::context::Reading;

use super::events::{AppEvent, StatusSnapshot};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain one climate sample.
///
/// Implementations must have bounded worst-case latency; a failed read is
/// transient by contract and the domain recovers by reusing the last valid
/// reading.
pub trait SensorPort {
    fn read_climate(&mut self) -> Result<Reading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain hands the derived decision to the relay
/// driver.  Dwell-time protection and heat/cool mutual exclusion live
/// behind this port, so `apply` returns the decision actually driven.
pub trait ActuatorPort {
    /// Drive the outputs toward `decision`; returns the applied decision.
    fn apply(&mut self, decision: StateId, now_ms: u32) -> StateId;

    /// Decision currently on the outputs.
    fn applied(&self) -> StateId;

    /// Release all output lines (shutdown path, bypasses dwell).
    fn release_all(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Report port (driven adapter: domain → collector link)
// ───────────────────────────────────────────────────────────────

/// The domain pushes one status snapshot per report tick through this
/// port.  Errors are transient: the caller drops the snapshot and tries
/// again next cadence tick.
pub trait ReportPort {
    fn send(&mut self, snapshot: &StatusSnapshot) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (serial log today; anything else tomorrow).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
