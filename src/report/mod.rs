//! Status reporting channel.
//!
//! Serializes a [`StatusSnapshot`] into a fixed-field, newline-delimited
//! record and writes it to the byte transport on the report cadence:
//!
//! ```text
//! temperature,humidity,setpoint,decision_code,timestamp_ms,stale\n
//! 70.3,45.2,72,1,123456,0
//! ```
//!
//! Decision codes: 0 = idle, 1 = heating, 2 = cooling.  The `stale` field
//! is 1 while the record carries a reused reading from before a sensor
//! outage.
//!
//! A send failure is non-fatal: the record for that tick is dropped and
//! counted, and the channel tries again at the next cadence tick.  There is
//! no retry queue — a snapshot is a point-in-time sample, not a log entry
//! that must be preserved.

pub mod transport;

use core::fmt::Write as _;

use log::warn;

use crate::app::events::StatusSnapshot;
use crate::app::ports::ReportPort;
use crate::error::TransportError;
use transport::Transport;

/// Upper bound on one encoded record.  The widest realistic record
/// (negative temperature, 20-digit timestamp) stays under 48 bytes.
const RECORD_CAP: usize = 64;

/// Encode one snapshot into the wire record.
pub fn encode_record(snap: &StatusSnapshot) -> heapless::String<RECORD_CAP> {
    let mut record = heapless::String::new();
    // Capacity is sized for the widest field combination, so the write
    // cannot fail; a debug build will still catch a layout regression.
    let _result = writeln!(
        record,
        "{:.1},{:.1},{},{},{},{}",
        snap.temperature_f,
        snap.humidity_pct,
        snap.setpoint_f,
        snap.decision.code(),
        snap.timestamp_ms,
        u8::from(snap.stale),
    );
    debug_assert!(_result.is_ok(), "record exceeded RECORD_CAP");
    record
}

/// Owns the transport and the drop accounting for the report stream.
pub struct ReportingChannel<T: Transport> {
    transport: T,
    sent: u32,
    dropped: u32,
}

impl<T: Transport> ReportingChannel<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sent: 0,
            dropped: 0,
        }
    }

    /// Records successfully handed to the transport.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Records dropped because the transport was busy or down.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Access the underlying transport (diagnostics, tests).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: Transport> ReportPort for ReportingChannel<T> {
    fn send(&mut self, snapshot: &StatusSnapshot) -> Result<(), TransportError> {
        let record = encode_record(snapshot);
        match self
            .transport
            .write(record.as_bytes())
            .and_then(|()| self.transport.flush())
        {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("report dropped ({e}); {} dropped so far", self.dropped);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::transport::NullTransport;
    use super::*;
    use crate::fsm::StateId;

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot {
            temperature_f: 70.3,
            humidity_pct: 45.24,
            setpoint_f: 72,
            decision: StateId::Heating,
            stale: false,
            timestamp_ms: 123_456,
        }
    }

    #[test]
    fn record_layout_is_stable() {
        let record = encode_record(&snapshot());
        assert_eq!(record.as_str(), "70.3,45.2,72,1,123456,0\n");
    }

    #[test]
    fn stale_flag_appears_in_record() {
        let mut snap = snapshot();
        snap.stale = true;
        snap.decision = StateId::Idle;
        let record = encode_record(&snap);
        assert_eq!(record.as_str(), "70.3,45.2,72,0,123456,1\n");
    }

    #[test]
    fn widest_record_fits_capacity() {
        let snap = StatusSnapshot {
            temperature_f: -58.0,
            humidity_pct: 100.0,
            setpoint_f: -99,
            decision: StateId::Cooling,
            stale: true,
            timestamp_ms: u64::MAX,
        };
        let record = encode_record(&snap);
        assert!(record.ends_with('\n'));
    }

    #[test]
    fn null_transport_counts_sends() {
        let mut chan = ReportingChannel::new(NullTransport);
        chan.send(&snapshot()).unwrap();
        chan.send(&snapshot()).unwrap();
        assert_eq!(chan.sent(), 2);
        assert_eq!(chan.dropped(), 0);
    }

    struct BusyTransport;
    impl Transport for BusyTransport {
        fn write(&mut self, _data: &[u8]) -> Result<(), TransportError> {
            Err(TransportError::Busy)
        }
        fn flush(&mut self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[test]
    fn busy_transport_drops_and_counts() {
        let mut chan = ReportingChannel::new(BusyTransport);
        assert_eq!(chan.send(&snapshot()), Err(TransportError::Busy));
        assert_eq!(chan.send(&snapshot()), Err(TransportError::Busy));
        assert_eq!(chan.sent(), 0);
        assert_eq!(chan.dropped(), 2);
    }
}
