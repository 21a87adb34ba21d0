//! RoomStat Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-tick event loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter      LogEventSink      Esp32TimeAdapter     │
//! │  (Sensor+Actuator)    (EventSink)       (monotonic clock)    │
//! │  ReportingChannel<UartTransport>        (ReportPort)         │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │        ThermostatService (pure logic)              │      │
//! │  │  FSM · SetPointStore · stale-reading recovery      │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  ISR ring: buttons → DebouncedButton, timers → event queue   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! INIT happens once below (peripherals, ISR binding, tick timers, service
//! start); the `loop` at the bottom is the RUNNING state and has no exit —
//! the device runs until power-off.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod control;
mod error;
mod events;
mod pins;

pub mod app;
mod adapters;
mod drivers;
pub mod fsm;
mod report;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::time::Esp32TimeAdapter;
use config::ThermostatConfig;
use drivers::actuator::ActuatorDriver;
use drivers::button::{ButtonEvent, DebouncedButton};
use events::Event;
use report::ReportingChannel;
use report::transport::UartTransport;
use sensors::climate::ClimateSensor;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("RoomStat v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    // Nothing persists across power loss on this board; every boot runs
    // the compiled-in defaults.
    let config = ThermostatConfig::default();

    // ── 3. Peripheral init ────────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 4. Buttons + ISR binding ──────────────────────────────
    // The ISR trampolines need 'static references; the two buttons are
    // wired once here and live for the life of the device.
    let button_up: &'static DebouncedButton = Box::leak(Box::new(DebouncedButton::new(
        ButtonEvent::Increment,
        config.debounce_window_ms,
    )));
    let button_down: &'static DebouncedButton = Box::leak(Box::new(DebouncedButton::new(
        ButtonEvent::Decrement,
        config.debounce_window_ms,
    )));
    if let Err(e) = drivers::hw_init::register_button_isrs(button_up, button_down) {
        log::error!("ISR binding failed: {} — set point fixed at default", e);
    }

    // ── 5. Tick sources ───────────────────────────────────────
    drivers::hw_timer::start_timers(
        u64::from(config.control_tick_ms) * 1_000,
        u64::from(config.report_interval_secs) * 1_000_000,
    );

    // ── 6. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(
        ClimateSensor::new(),
        ActuatorDriver::new(config.min_dwell_ms()),
    );
    let mut log_sink = LogEventSink::new();
    let mut reporter = ReportingChannel::new(UartTransport);
    let time = Esp32TimeAdapter::new();

    // ── 7. Service ────────────────────────────────────────────
    let mut service = app::service::ThermostatService::new(config.clone());
    service.start(&mut log_sink);

    info!("System ready. Entering event loop.");

    // ── 8. Event loop (RUNNING) ───────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    let mut sim_report_counter: u64 = 0;
    #[cfg(not(target_os = "espidf"))]
    let sim_ticks_per_report =
        u64::from(config.report_interval_secs) * 1_000 / u64::from(config.control_tick_ms);

    loop {
        // Simulate the timer interrupts via sleep on non-espidf targets.
        // On real hardware, the CPU waits for the timer/GPIO interrupts
        // that feed the queue and the button slots.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.control_tick_ms,
            )));
            events::push_event(Event::ControlTick);
            sim_report_counter += 1;
            if sim_report_counter >= sim_ticks_per_report {
                events::push_event(Event::ReportTick);
                sim_report_counter = 0;
            }
        }

        let now_ms = time.uptime_ms();

        events::drain_events(|event| match event {
            Event::ControlTick => {
                // (a) at most one pending press per button per tick
                for button in [button_up, button_down] {
                    if let Some(press) = button.take() {
                        service.handle_button(press, &mut log_sink);
                    }
                }
                // (b) sample → decide → actuate on the sample cadence
                service.control_tick(&mut hw, &mut log_sink, now_ms);
            }

            Event::ReportTick => {
                // (c) snapshot → collector, independent cadence
                service.report_tick(&hw, &mut reporter, &mut log_sink, now_ms);
            }
        });

        // Idle until the next tick event arrives.
        #[cfg(target_os = "espidf")]
        unsafe {
            esp_idf_svc::sys::vTaskDelay(1);
        }
    }
}
