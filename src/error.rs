#![allow(dead_code)] // The unified Error/Result pair is the funnel for future fallible ports

//! Unified error types for the RoomStat firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform.  All variants are `Copy` so they can be cheaply passed around
//! without allocation.
//!
//! Note what is *absent*: a set-point out-of-range variant.  Out-of-range
//! adjustments are silently clamped by the set-point store and never surface
//! as errors.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The climate sensor could not be read or returned bad data.
    Sensor(SensorError),
    /// The report transport could not accept a record.
    Transport(TransportError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Failures reading the climate sensor.  All transient: the control loop
/// reuses the last valid reading and flags reports as stale until the
/// sensor recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not acknowledge or a measurement timed out.
    Unavailable,
    /// The I²C transaction itself failed.
    BusError,
    /// Measurement frame arrived but its CRC did not match.
    CrcMismatch,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "sensor unavailable"),
            Self::BusError => write!(f, "I2C bus error"),
            Self::CrcMismatch => write!(f, "measurement CRC mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures writing a status record to the collector link.  All transient:
/// the record for that cadence tick is dropped and the channel tries again
/// at the next one — a snapshot is a point-in-time sample, not a log entry
/// that must be preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// TX path is busy (FIFO full, previous write still draining).
    Busy,
    /// Link is down (cable unplugged, collector gone).
    Disconnected,
    /// The underlying write returned an error or wrote short.
    WriteFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "transport busy"),
            Self::Disconnected => write!(f, "transport disconnected"),
            Self::WriteFailed => write!(f, "transport write failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
