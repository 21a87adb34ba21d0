//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (which goes to UART / USB-CDC in production).  A future
//! MQTT or display adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Report(s) => {
                info!(
                    "STATUS | {:?} | T={:.1}F RH={:.0}% | set={}F | {}",
                    s.decision,
                    s.temperature_f,
                    s.humidity_pct,
                    s.setpoint_f,
                    if s.stale { "STALE" } else { "fresh" },
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::SetPointChanged { setpoint_f } => {
                info!("SETPT | {}F", setpoint_f);
            }
            AppEvent::SensorLost => {
                info!("SENSOR | lost, reusing last reading");
            }
            AppEvent::SensorRecovered => {
                info!("SENSOR | recovered");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
