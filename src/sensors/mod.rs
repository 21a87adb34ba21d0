//! Sensor subsystem.
//!
//! One sensor on this board: the AHT20 combined temperature/humidity part
//! on the I²C bus.  Its internal bus protocol stays inside
//! [`climate`]; the rest of the firmware only ever sees a
//! [`Reading`](crate::fsm::context::Reading) or a
//! [`SensorError`](crate::error::SensorError).

pub mod climate;
