//! Integration tests: ThermostatService → FSM → actuator → report channel.

use roomstat::app::events::AppEvent;
use roomstat::app::ports::{ActuatorPort, EventSink, ReportPort, SensorPort};
use roomstat::app::service::ThermostatService;
use roomstat::config::ThermostatConfig;
use roomstat::drivers::actuator::ActuatorDriver;
use roomstat::drivers::button::{ButtonEvent, DebouncedButton};
use roomstat::error::{SensorError, TransportError};
use roomstat::fsm::StateId;
use roomstat::fsm::context::Reading;
use roomstat::report::ReportingChannel;
use roomstat::report::transport::Transport;

// ── Mock implementations ──────────────────────────────────────

/// Sensor that replays a script of results, then repeats the last entry.
struct ScriptedHw {
    script: Vec<Result<Reading, SensorError>>,
    cursor: usize,
    actuator: ActuatorDriver,
}

impl ScriptedHw {
    fn new(script: Vec<Result<Reading, SensorError>>, min_dwell_ms: u32) -> Self {
        Self {
            script,
            cursor: 0,
            actuator: ActuatorDriver::new(min_dwell_ms),
        }
    }
}

fn reading(temperature_f: f32) -> Result<Reading, SensorError> {
    Ok(Reading {
        temperature_f,
        humidity_pct: 45.0,
    })
}

impl SensorPort for ScriptedHw {
    fn read_climate(&mut self) -> Result<Reading, SensorError> {
        let result = self.script[self.cursor.min(self.script.len() - 1)];
        self.cursor += 1;
        result
    }
}

impl ActuatorPort for ScriptedHw {
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

struct RecordingSink(Vec<AppEvent>);
impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.push(*event);
    }
}

/// Capture transport: collects the raw bytes the channel writes, and can
/// be switched to a failing mode to exercise the drop path.
#[derive(Default)]
struct CaptureTransport {
    bytes: Vec<u8>,
    fail_with: Option<TransportError>,
}

impl Transport for CaptureTransport {
    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }
    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Per-tick sample cadence keeps scenario scripts compact.
fn tight_config() -> ThermostatConfig {
    ThermostatConfig {
        sample_interval_ms: 100,
        control_tick_ms: 100,
        ..ThermostatConfig::default()
    }
}

// ── Field scenario: buttons, debounce, stale recovery ─────────

#[test]
fn setpoint_scenario_single_and_bounced_presses() {
    let mut svc = ThermostatService::new(tight_config());
    let mut hw = ScriptedHw::new(vec![reading(70.0)], 60_000);
    let mut sink = RecordingSink(Vec::new());
    svc.start(&mut sink);

    // setpoint=72, temp=70, hysteresis=1 → HEATING
    svc.control_tick(&mut hw, &mut sink, 100);
    assert_eq!(svc.state(), StateId::Heating);

    let button_up = DebouncedButton::new(ButtonEvent::Increment, 200);

    // One clean press: exactly one degree.
    button_up.on_raw_edge(1_000);
    if let Some(press) = button_up.take() {
        svc.handle_button(press, &mut sink);
    }
    assert_eq!(svc.setpoint_f(), 73, "one press is one degree");

    // Two raw edges inside one debounce window: still one degree.
    button_up.on_raw_edge(2_000);
    button_up.on_raw_edge(2_050);
    let mut drained = 0;
    while let Some(press) = button_up.take() {
        svc.handle_button(press, &mut sink);
        drained += 1;
    }
    assert_eq!(drained, 1, "bounced edge must not produce a second event");
    assert_eq!(svc.setpoint_f(), 74);
}

#[test]
fn sensor_outage_keeps_loop_running_with_stale_reports() {
    let script = vec![
        reading(70.0),
        Err(SensorError::Unavailable), // tick N fails
        reading(70.5),                 // tick N+1 recovers
    ];
    let mut svc = ThermostatService::new(tight_config());
    let mut hw = ScriptedHw::new(script, 60_000);
    let mut sink = RecordingSink(Vec::new());
    let mut reporter = ReportingChannel::new(CaptureTransport::default());
    svc.start(&mut sink);

    svc.control_tick(&mut hw, &mut sink, 100);
    svc.report_tick(&hw, &mut reporter, &mut sink, 150);

    // Tick N: sensor fails — report must carry the previous reading, stale.
    svc.control_tick(&mut hw, &mut sink, 200);
    assert_eq!(svc.state(), StateId::Heating, "decision persists through outage");
    let stale_snap = svc.build_snapshot(&hw, 250).unwrap();
    assert!(stale_snap.stale);
    assert!((stale_snap.temperature_f - 70.0).abs() < 0.01);
    svc.report_tick(&hw, &mut reporter, &mut sink, 250);

    // Tick N+1: loop continues, sensor back, staleness cleared.
    svc.control_tick(&mut hw, &mut sink, 300);
    assert!(!svc.sensor_down());
    let fresh_snap = svc.build_snapshot(&hw, 350).unwrap();
    assert!(!fresh_snap.stale);
    assert!((fresh_snap.temperature_f - 70.5).abs() < 0.01);

    assert!(sink.0.contains(&AppEvent::SensorLost));
    assert!(sink.0.contains(&AppEvent::SensorRecovered));
}

// ── Wire records end-to-end ───────────────────────────────────

#[test]
fn report_records_reach_the_transport_in_wire_format() {
    let mut svc = ThermostatService::new(tight_config());
    let mut hw = ScriptedHw::new(vec![reading(70.0)], 60_000);
    let mut sink = RecordingSink(Vec::new());
    let mut reporter = ReportingChannel::new(CaptureTransport::default());
    svc.start(&mut sink);

    svc.control_tick(&mut hw, &mut sink, 100);
    svc.report_tick(&hw, &mut reporter, &mut sink, 1_000);
    svc.report_tick(&hw, &mut reporter, &mut sink, 2_000);

    let wire = String::from_utf8(reporter.transport().bytes.clone()).unwrap();
    assert_eq!(wire, "70.0,45.0,72,1,1000,0\n70.0,45.0,72,1,2000,0\n");
    assert_eq!(reporter.sent(), 2);
}

#[test]
fn busy_link_drops_one_record_and_recovers() {
    let mut svc = ThermostatService::new(tight_config());
    let mut hw = ScriptedHw::new(vec![reading(70.0)], 60_000);
    let mut sink = RecordingSink(Vec::new());
    let mut reporter = ReportingChannel::new(CaptureTransport::default());
    svc.start(&mut sink);
    svc.control_tick(&mut hw, &mut sink, 100);

    reporter.transport_mut().fail_with = Some(TransportError::Busy);
    svc.report_tick(&hw, &mut reporter, &mut sink, 1_000);
    assert_eq!(reporter.dropped(), 1);
    assert!(reporter.transport().bytes.is_empty());

    // Link clears: next cadence tick carries a fresh snapshot, no backlog.
    reporter.transport_mut().fail_with = None;
    svc.report_tick(&hw, &mut reporter, &mut sink, 2_000);
    let wire = String::from_utf8(reporter.transport().bytes.clone()).unwrap();
    assert_eq!(wire, "70.0,45.0,72,1,2000,0\n");
    assert_eq!(reporter.sent(), 1);
}

// ── Dwell behaviour through the full service path ─────────────

#[test]
fn dwell_holds_outputs_against_fast_decision_swings() {
    // 2 s dwell, one sample per tick, temperature alternating across the
    // band every second: the FSM decision flips but the relays must not.
    let script = vec![
        reading(70.0), // heating
        reading(75.0), // wants cooling — inside dwell
        reading(70.0), // wants heating — inside dwell
        reading(75.0), // dwell expired by now
    ];
    let mut config = tight_config();
    config.min_dwell_secs = 2;
    let mut svc = ThermostatService::new(config);
    let mut hw = ScriptedHw::new(script, 2_000);
    let mut sink = RecordingSink(Vec::new());
    svc.start(&mut sink);

    svc.control_tick(&mut hw, &mut sink, 0);
    assert_eq!(hw.applied(), StateId::Heating);

    svc.control_tick(&mut hw, &mut sink, 1_000);
    assert_eq!(hw.applied(), StateId::Heating, "dwell holds the heat call");
    assert_eq!(hw.actuator.pending(), Some(StateId::Cooling));

    svc.control_tick(&mut hw, &mut sink, 1_500);
    assert_eq!(hw.applied(), StateId::Heating);

    svc.control_tick(&mut hw, &mut sink, 2_500);
    assert_eq!(hw.applied(), StateId::Cooling, "held decision lands after dwell");
    assert!(!(hw.actuator.heat_line() && hw.actuator.cool_line()));
}
