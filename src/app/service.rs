//! Application service — the hexagonal core of the control loop.
//!
//! [`ThermostatService`] owns the FSM, the set-point store, and the last
//! valid reading.  It exposes a clean, hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │   ThermostatService    │
//! ActuatorPort ◀──│  FSM · SetPointStore   │──▶ ReportPort
//!                 └────────────────────────┘
//! ```
//!
//! Lifecycle mirrors the two loop states: construction plus [`start`] is
//! the one-time INIT phase (main wires interrupts and timers around it);
//! every [`control_tick`] / [`report_tick`] thereafter is RUNNING.  There
//! is no terminal state — the loop runs until power-off.
//!
//! [`start`]: ThermostatService::start
//! [`control_tick`]: ThermostatService::control_tick
//! [`report_tick`]: ThermostatService::report_tick

use log::{info, warn};

use crate::config::ThermostatConfig;
use crate::control::setpoint::SetPointStore;
use crate::drivers::button::ButtonEvent;
use crate::fsm::context::{FsmContext, Reading};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::events::{AppEvent, StatusSnapshot};
use super::ports::{ActuatorPort, EventSink, ReportPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// ThermostatService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct ThermostatService {
    fsm: Fsm,
    ctx: FsmContext,
    /// Shared with the button path conceptually; physically the buttons
    /// hand events to [`handle_button`](Self::handle_button), which is the
    /// only writer besides the store's own clamping.
    setpoint: SetPointStore,
    /// Control ticks between sensor samples (derived from config).
    sample_every_ticks: u64,
    tick_count: u64,
    /// Last reading the sensor actually delivered.
    last_reading: Option<Reading>,
    /// True while the sensor is failing and readings are reused.
    sensor_down: bool,
}

impl ThermostatService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: ThermostatConfig) -> Self {
        let setpoint = SetPointStore::new(&config);
        let sample_every_ticks = u64::from(config.sample_every_ticks());
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            setpoint,
            sample_every_ticks,
            tick_count: 0,
            last_reading: None,
            sensor_down: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Finish INIT: run the FSM's initial `on_enter` and announce the
    /// starting state.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "ThermostatService started in {:?}, set point {}F",
            self.fsm.current_state(),
            self.setpoint.read()
        );
    }

    // ── Button handling ───────────────────────────────────────

    /// Apply one debounced button event to the set-point store.
    ///
    /// The main loop drains **at most one** event per button per control
    /// tick; together with the buttons' single-slot pending flags this
    /// guarantees one physical press moves the set point by exactly one
    /// step.  Returns the set point after the adjustment.
    pub fn handle_button(&mut self, event: ButtonEvent, sink: &mut impl EventSink) -> i16 {
        let setpoint_f = match event {
            ButtonEvent::Increment => self.setpoint.increment(),
            ButtonEvent::Decrement => self.setpoint.decrement(),
        };
        info!("button {:?}: set point now {}F", event, setpoint_f);
        sink.emit(&AppEvent::SetPointChanged { setpoint_f });
        setpoint_f
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control tick.  On sample cadence this reads the sensor,
    /// derives the decision, and drives the actuator.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn control_tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        self.tick_count += 1;
        if self.tick_count % self.sample_every_ticks == 0 {
            self.sample(hw, sink, now_ms);
        }
    }

    /// Build and send one status snapshot.  Cadence is driven by its own
    /// timer, independent of the control cadence.  A transport failure
    /// drops the snapshot — the next tick sends a fresh one.
    pub fn report_tick(
        &mut self,
        hw: &impl ActuatorPort,
        reporter: &mut impl ReportPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        let Some(snapshot) = self.build_snapshot(hw, now_ms) else {
            // Nothing sampled yet — a record of zeros would poison the
            // collector's history.
            return;
        };
        sink.emit(&AppEvent::Report(snapshot));
        // Drops are non-fatal; the channel logs and counts them.
        reporter.send(&snapshot).ok();
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state (the derived decision, before dwell).
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Current set point.
    pub fn setpoint_f(&self) -> i16 {
        self.setpoint.read()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// True while the sensor is failing and readings are reused.
    pub fn sensor_down(&self) -> bool {
        self.sensor_down
    }

    /// Build a snapshot of the current status, or `None` before the first
    /// valid reading.
    pub fn build_snapshot(&self, hw: &impl ActuatorPort, now_ms: u64) -> Option<StatusSnapshot> {
        let reading = self.last_reading?;
        Some(StatusSnapshot {
            temperature_f: reading.temperature_f,
            humidity_pct: reading.humidity_pct,
            setpoint_f: self.setpoint.read(),
            decision: hw.applied(),
            stale: self.sensor_down,
            timestamp_ms: now_ms,
        })
    }

    // ── Internal ──────────────────────────────────────────────

    /// Sample → decide → actuate.
    fn sample(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        match hw.read_climate() {
            Ok(reading) => {
                if self.sensor_down {
                    info!("sensor recovered: {:.1}F", reading.temperature_f);
                    sink.emit(&AppEvent::SensorRecovered);
                }
                self.sensor_down = false;
                self.last_reading = Some(reading);
            }
            Err(e) => {
                if !self.sensor_down {
                    warn!("sensor read failed ({e}); reusing last reading as stale");
                    sink.emit(&AppEvent::SensorLost);
                }
                self.sensor_down = true;
            }
        }

        // Before the first valid reading there is nothing to decide on;
        // the outputs stay released.
        let Some(reading) = self.last_reading else {
            return;
        };

        let prev = self.fsm.current_state();
        self.ctx.reading = reading;
        self.ctx.reading_stale = self.sensor_down;
        self.ctx.setpoint_f = self.setpoint.read();
        self.fsm.tick(&mut self.ctx);

        let decision = self.fsm.current_state();
        // Dwell truncation to u32 wraps at ~49.7 days, which the driver's
        // wrapping arithmetic absorbs.
        hw.apply(decision, now_ms as u32);

        if decision != prev {
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: decision,
            });
        }
    }
}
