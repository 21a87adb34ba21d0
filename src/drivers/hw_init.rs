//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, the I²C bus for the climate sensor, and the
//! report UART using raw ESP-IDF sys calls. Called once from `main()` before
//! the event loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::{SensorError, TransportError};
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    I2cInitFailed(i32),
    UartInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::I2cInitFailed(rc) => write!(f, "I2C master init failed (rc={})", rc),
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

/// FreeRTOS runs at the default 100 Hz tick on this board.
#[cfg(target_os = "espidf")]
const fn ms_to_ticks(ms: u32) -> u32 {
    ms / 10
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
        init_i2c()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO outputs (relay lines) ────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::HEAT_RELAY_GPIO, pins::COOL_RELAY_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        // Relays released until the actuator driver takes over.
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: relay outputs configured (heat, cool)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── GPIO inputs (buttons) ─────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    for &pin in &[pins::BUTTON_UP_GPIO, pins::BUTTON_DOWN_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: button inputs configured (up, down)");
    Ok(())
}

// ── GPIO ISR service — button edge handlers ───────────────────
//
// The ISR trampolines need 'static access to the two DebouncedButton
// instances.  The instances are owned and wired by main(); the raw
// pointers below are written exactly once, before interrupts are
// enabled, and only read afterwards.

use crate::drivers::button::DebouncedButton;

#[cfg(target_os = "espidf")]
static mut BUTTON_UP_PTR: *const DebouncedButton = core::ptr::null();
#[cfg(target_os = "espidf")]
static mut BUTTON_DOWN_PTR: *const DebouncedButton = core::ptr::null();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_up_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
    let now_ms = ((unsafe { esp_timer_get_time() }) / 1_000) as u32;
    // SAFETY: BUTTON_UP_PTR was written in register_button_isrs() before
    // this interrupt was enabled and is never written again.
    if let Some(btn) = unsafe { BUTTON_UP_PTR.as_ref() } {
        btn.on_raw_edge(now_ms);
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_down_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: as for button_up_isr.
    let now_ms = ((unsafe { esp_timer_get_time() }) / 1_000) as u32;
    // SAFETY: as for button_up_isr.
    if let Some(btn) = unsafe { BUTTON_DOWN_PTR.as_ref() } {
        btn.on_raw_edge(now_ms);
    }
}

/// Install the GPIO ISR service and bind both set-point buttons.
/// Call after [`init_peripherals`] and before the event loop.
#[cfg(target_os = "espidf")]
pub fn register_button_isrs(
    up: &'static DebouncedButton,
    down: &'static DebouncedButton,
) -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The pointer statics are
    // written here, once, before the per-pin interrupts are enabled below.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        BUTTON_UP_PTR = up;
        BUTTON_DOWN_PTR = down;

        gpio_set_intr_type(pins::BUTTON_UP_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        gpio_isr_handler_add(
            pins::BUTTON_UP_GPIO,
            Some(button_up_isr),
            core::ptr::null_mut(),
        );
        gpio_intr_enable(pins::BUTTON_UP_GPIO);

        gpio_set_intr_type(pins::BUTTON_DOWN_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        gpio_isr_handler_add(
            pins::BUTTON_DOWN_GPIO,
            Some(button_down_isr),
            core::ptr::null_mut(),
        );
        gpio_intr_enable(pins::BUTTON_DOWN_GPIO);

        info!("hw_init: ISR service installed (button_up, button_down)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn register_button_isrs(
    _up: &'static DebouncedButton,
    _down: &'static DebouncedButton,
) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): button ISRs skipped");
    Ok(())
}

// ── I²C master (climate sensor) ───────────────────────────────

#[cfg(target_os = "espidf")]
const I2C_PORT: i32 = 0;
/// Bounded I²C transaction timeout — keeps the sample path's worst case
/// well under one control tick.
#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_MS: u32 = 50;

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), HwInitError> {
    let cfg = i2c_config_t {
        mode: i2c_mode_t_I2C_MODE_MASTER,
        sda_io_num: pins::I2C_SDA_GPIO,
        scl_io_num: pins::I2C_SCL_GPIO,
        sda_pullup_en: true,
        scl_pullup_en: true,
        __bindgen_anon_1: i2c_config_t__bindgen_ty_1 {
            master: i2c_config_t__bindgen_ty_1__bindgen_ty_1 {
                clk_speed: pins::I2C_FREQ_HZ,
            },
        },
        ..Default::default()
    };

    let ret = unsafe { i2c_param_config(I2C_PORT, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    let ret = unsafe { i2c_driver_install(I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }

    info!("hw_init: I2C master configured (AHT20 @ 0x38)");
    Ok(())
}

/// Write `data` to an I²C device, bounded by [`I2C_TIMEOUT_MS`].
#[cfg(target_os = "espidf")]
pub fn i2c_write(addr: u8, data: &[u8]) -> Result<(), SensorError> {
    // SAFETY: the I2C driver was installed in init_i2c(); the buffer
    // outlives the blocking call.
    let ret = unsafe {
        i2c_master_write_to_device(
            I2C_PORT,
            addr,
            data.as_ptr(),
            data.len(),
            ms_to_ticks(I2C_TIMEOUT_MS),
        )
    };
    match ret {
        x if x == ESP_OK as i32 => Ok(()),
        x if x == ESP_ERR_TIMEOUT => Err(SensorError::Unavailable),
        _ => Err(SensorError::BusError),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write(_addr: u8, _data: &[u8]) -> Result<(), SensorError> {
    Err(SensorError::Unavailable)
}

/// Read `buf.len()` bytes from an I²C device, bounded by [`I2C_TIMEOUT_MS`].
#[cfg(target_os = "espidf")]
pub fn i2c_read(addr: u8, buf: &mut [u8]) -> Result<(), SensorError> {
    // SAFETY: as for i2c_write.
    let ret = unsafe {
        i2c_master_read_from_device(
            I2C_PORT,
            addr,
            buf.as_mut_ptr(),
            buf.len(),
            ms_to_ticks(I2C_TIMEOUT_MS),
        )
    };
    match ret {
        x if x == ESP_OK as i32 => Ok(()),
        x if x == ESP_ERR_TIMEOUT => Err(SensorError::Unavailable),
        _ => Err(SensorError::BusError),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_read(_addr: u8, _buf: &mut [u8]) -> Result<(), SensorError> {
    Err(SensorError::Unavailable)
}

// ── UART (report link) ────────────────────────────────────────

/// Bounded TX-drain timeout — one slow report must not starve the buttons.
#[cfg(target_os = "espidf")]
const UART_TX_TIMEOUT_MS: u32 = 1_000;
#[cfg(target_os = "espidf")]
const UART_TX_BUF_BYTES: i32 = 256;

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), HwInitError> {
    // Collector link: 115200 8N1, no flow control.
    let cfg = uart_config_t {
        baud_rate: pins::REPORT_UART_BAUD as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    let ret = unsafe { uart_param_config(pins::REPORT_UART_NUM, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartInitFailed(ret));
    }
    let ret = unsafe {
        uart_set_pin(
            pins::REPORT_UART_NUM,
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            -1,
            -1,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartInitFailed(ret));
    }
    let ret = unsafe {
        uart_driver_install(
            pins::REPORT_UART_NUM,
            UART_TX_BUF_BYTES,
            UART_TX_BUF_BYTES,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartInitFailed(ret));
    }

    info!("hw_init: report UART configured (115200 8N1)");
    Ok(())
}

/// Queue `data` on the report UART.  Returns `Busy` when the TX ring cannot
/// take the whole record — the caller drops the record, it does not wait.
#[cfg(target_os = "espidf")]
pub fn uart_write(data: &[u8]) -> Result<(), TransportError> {
    // SAFETY: the UART driver was installed in init_uart(); uart_write_bytes
    // copies out of `data` before returning.
    let written = unsafe {
        uart_write_bytes(
            pins::REPORT_UART_NUM,
            data.as_ptr().cast::<core::ffi::c_void>(),
            data.len(),
        )
    };
    if written < 0 {
        return Err(TransportError::WriteFailed);
    }
    if written as usize != data.len() {
        return Err(TransportError::Busy);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write(_data: &[u8]) -> Result<(), TransportError> {
    Ok(())
}

/// Block until the TX FIFO drains, bounded by [`UART_TX_TIMEOUT_MS`].
#[cfg(target_os = "espidf")]
pub fn uart_flush() -> Result<(), TransportError> {
    // SAFETY: driver installed in init_uart().
    let ret = unsafe { uart_wait_tx_done(pins::REPORT_UART_NUM, ms_to_ticks(UART_TX_TIMEOUT_MS)) };
    match ret {
        x if x == ESP_OK as i32 => Ok(()),
        x if x == ESP_ERR_TIMEOUT => Err(TransportError::Busy),
        _ => Err(TransportError::WriteFailed),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_flush() -> Result<(), TransportError> {
    Ok(())
}
