//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates the two periodic tick sources — control tick and report tick —
//! that push events into the lock-free SPSC queue.  On simulation targets
//! the main loop drives events from a sleep loop instead.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event().

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut REPORT_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ControlTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn report_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ReportTick);
}

/// Start the periodic tick timers.  Periods come from configuration; the
/// report cadence is deliberately independent of the control cadence.
#[cfg(target_os = "espidf")]
pub fn start_timers(control_period_us: u64, report_period_us: u64) {
    // SAFETY: CONTROL_TIMER and REPORT_TIMER are written here once at boot
    // from the single main-task context before any timer callbacks fire.
    // The callbacks themselves only call push_event(), which is lock-free.
    unsafe {
        let control_args = esp_timer_create_args_t {
            callback: Some(control_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"control\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&control_args, &raw mut CONTROL_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: control timer create failed (rc={}) — continuing without ticks",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(CONTROL_TIMER, control_period_us);
        if ret != ESP_OK {
            log::error!("hw_timer: control timer start failed (rc={})", ret);
            return;
        }

        let report_args = esp_timer_create_args_t {
            callback: Some(report_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"report\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&report_args, &raw mut REPORT_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: report timer create failed (rc={}) — continuing without reports",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(REPORT_TIMER, report_period_us);
        if ret != ESP_OK {
            log::error!("hw_timer: report timer start failed (rc={})", ret);
            return;
        }

        info!(
            "hw_timer: control@{}us + report@{}us started",
            control_period_us, report_period_us
        );
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_control_period_us: u64, _report_period_us: u64) {
    log::info!("hw_timer(sim): timers not started (events driven by sleep loop)");
}

/// Stop both tick timers.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    // SAFETY: handles are valid if start_timers() succeeded; null-check
    // prevents use of a never-created timer.
    unsafe {
        if !CONTROL_TIMER.is_null() {
            esp_timer_stop(CONTROL_TIMER);
        }
        if !REPORT_TIMER.is_null() {
            esp_timer_stop(REPORT_TIMER);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {}
