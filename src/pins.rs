//! GPIO / peripheral pin assignments for the RoomStat main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Relay outputs (heat call / cool call, dry-contact relay board)
// ---------------------------------------------------------------------------

/// Digital output: energises the heat-call relay (active HIGH).
pub const HEAT_RELAY_GPIO: i32 = 1;
/// Digital output: energises the cool-call relay (active HIGH).
/// Never asserted together with [`HEAT_RELAY_GPIO`]; the actuator driver
/// clears the opposite line before setting a new one.
pub const COOL_RELAY_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// User buttons (active-low momentary switches with external pull-ups)
// ---------------------------------------------------------------------------

/// Set-point raise button — falling edge fires the GPIO ISR.
pub const BUTTON_UP_GPIO: i32 = 4;
/// Set-point lower button — falling edge fires the GPIO ISR.
pub const BUTTON_DOWN_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// I²C bus — AHT20 temperature/humidity sensor
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

/// AHT20 fixed I²C address.
pub const AHT20_I2C_ADDR: u8 = 0x38;
/// I²C bus clock (standard mode — the AHT20 tops out at 400 kHz).
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// UART — status reporting link to the collector
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
/// UART port number used for the report link (UART0 is the console).
pub const REPORT_UART_NUM: i32 = 1;
/// Collector link runs 115200 8N1.
pub const REPORT_UART_BAUD: u32 = 115_200;
