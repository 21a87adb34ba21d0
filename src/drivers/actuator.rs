//! Heat/cool relay actuator driver.
//!
//! The only component permitted to write the relay output lines.
//!
//! ## Hardware protection
//!
//! A compressor that is short-cycled loses its refrigerant pressure
//! equalisation and a relay that chatters welds its contacts, so the driver
//! enforces a minimum dwell time between physical output changes: a new
//! decision arriving inside the dwell window is recorded as pending and the
//! previous physical state held.  The control loop re-derives the decision
//! every sample tick, so the held decision is re-applied naturally once the
//! window elapses — no separate timer thread.
//!
//! Heat and cool are mutually exclusive by construction: the opposite line
//! is always cleared before the requested line is set.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the two relay GPIOs via hw_init helpers.
//! On host/test: tracks line state in-memory only.

use log::{debug, info};

use crate::drivers::hw_init;
use crate::fsm::StateId;
use crate::pins;

pub struct ActuatorDriver {
    min_dwell_ms: u32,
    /// Decision currently driven onto the relays.
    applied: StateId,
    /// Decision requested during the dwell window, not yet driven.
    pending: Option<StateId>,
    /// Timestamp of the last physical output change (None until the first).
    last_change_ms: Option<u32>,
    heat_line: bool,
    cool_line: bool,
}

impl ActuatorDriver {
    /// Construct with both relay lines released.
    pub fn new(min_dwell_ms: u32) -> Self {
        let mut driver = Self {
            min_dwell_ms,
            applied: StateId::Idle,
            pending: None,
            last_change_ms: None,
            heat_line: false,
            cool_line: false,
        };
        driver.set_outputs(StateId::Idle);
        driver
    }

    /// Drive the relays toward `decision`, honouring the dwell window.
    /// Returns the decision actually on the outputs after the call — the
    /// value reports and telemetry must carry.
    pub fn apply(&mut self, decision: StateId, now_ms: u32) -> StateId {
        if decision == self.applied {
            self.pending = None;
            return self.applied;
        }

        if let Some(last) = self.last_change_ms {
            if now_ms.wrapping_sub(last) < self.min_dwell_ms {
                if self.pending != Some(decision) {
                    debug!(
                        "actuator: dwell holds {:?}, {:?} pending",
                        self.applied, decision
                    );
                }
                self.pending = Some(decision);
                return self.applied;
            }
        }

        info!("actuator: {:?} -> {:?}", self.applied, decision);
        self.set_outputs(decision);
        self.applied = decision;
        self.pending = None;
        self.last_change_ms = Some(now_ms);
        self.applied
    }

    /// Release both relay lines immediately, bypassing dwell.
    /// Shutdown path only (power-off, panic handler).
    pub fn release_all(&mut self) {
        self.set_outputs(StateId::Idle);
        self.applied = StateId::Idle;
        self.pending = None;
    }

    /// Decision currently on the outputs.
    pub fn applied(&self) -> StateId {
        self.applied
    }

    /// Decision held back by the dwell window, if any.
    pub fn pending(&self) -> Option<StateId> {
        self.pending
    }

    /// Current heat-call line level.
    pub fn heat_line(&self) -> bool {
        self.heat_line
    }

    /// Current cool-call line level.
    pub fn cool_line(&self) -> bool {
        self.cool_line
    }

    // ── Internal ──────────────────────────────────────────────

    /// Clear the opposite call before asserting the new one, so the two
    /// lines are never high together — not even for one instruction.
    fn set_outputs(&mut self, decision: StateId) {
        match decision {
            StateId::Heating => {
                self.write_cool(false);
                self.write_heat(true);
            }
            StateId::Cooling => {
                self.write_heat(false);
                self.write_cool(true);
            }
            StateId::Idle => {
                self.write_heat(false);
                self.write_cool(false);
            }
        }
    }

    fn write_heat(&mut self, on: bool) {
        self.heat_line = on;
        hw_init::gpio_write(pins::HEAT_RELAY_GPIO, on);
    }

    fn write_cool(&mut self, on: bool) {
        self.cool_line = on;
        hw_init::gpio_write(pins::COOL_RELAY_GPIO, on);
    }
}
