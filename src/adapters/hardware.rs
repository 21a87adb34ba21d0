//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the climate sensor and the relay actuator driver, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  Together with `hw_init`
//! this is the only place in the system that touches actual hardware.  On
//! non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::actuator::ActuatorDriver;
use crate::error::SensorError;
use crate::fsm::StateId;
use crate::fsm::context::Reading;
use crate::sensors::climate::ClimateSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    climate: ClimateSensor,
    actuator: ActuatorDriver,
}

impl HardwareAdapter {
    pub fn new(climate: ClimateSensor, actuator: ActuatorDriver) -> Self {
        Self { climate, actuator }
    }

    /// Direct access for diagnostics (pending decision, line levels).
    pub fn actuator(&self) -> &ActuatorDriver {
        &self.actuator
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_climate(&mut self) -> Result<Reading, SensorError> {
        self.climate.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn apply(&mut self, decision: StateId, now_ms: u32) -> StateId {
        self.actuator.apply(decision, now_ms)
    }

    fn applied(&self) -> StateId {
        self.actuator.applied()
    }

    fn release_all(&mut self) {
        self.actuator.release_all();
    }
}
