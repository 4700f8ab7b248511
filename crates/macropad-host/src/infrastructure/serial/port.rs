//! Production serial transmission: one scoped open-write-close per frame.
//!
//! The port is *not* held open between sends.  CircuitPython boards reset
//! their CDC state when the host closes the port, and a board that is
//! unplugged mid-session would otherwise pin a stale file handle until the
//! daemon exits.  Opening per frame costs little at these cadences and makes
//! every tick observe the board's current state.
//!
//! The open and write carry a timeout so a wedged board cannot stall the
//! tick loop indefinitely.

use std::io;
use std::time::Duration;

use macropad_core::PortIdentity;

use crate::application::registry::TransportFactory;
use crate::application::transport::{TransportLink, WirePort};

/// Upper bound for the blocking open/write of a single frame.
const TRANSMIT_TIMEOUT: Duration = Duration::from_millis(500);

/// [`WirePort`] that writes through a real serial device node.
pub struct SerialWirePort {
    path: String,
    baud_rate: u32,
}

impl SerialWirePort {
    /// Creates a port writer for the device node at `path`.
    pub fn new(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
        }
    }
}

impl WirePort for SerialWirePort {
    /// Opens the port, writes `payload` as one buffer, and closes it again.
    ///
    /// The handle is dropped on every return path, so no OS handle survives
    /// a failed write.
    fn transmit(&mut self, payload: &[u8]) -> io::Result<()> {
        let mut port = serialport::new(self.path.as_str(), self.baud_rate)
            .timeout(TRANSMIT_TIMEOUT)
            .open()
            .map_err(io::Error::from)?;
        port.write_all(payload)?;
        port.flush()?;
        Ok(())
    }
}

/// Builds [`SerialWirePort`]-backed links for newly discovered identities.
pub struct SerialTransportFactory {
    baud_rate: u32,
}

impl SerialTransportFactory {
    /// Creates a factory whose links open ports at `baud_rate`.
    pub fn new(baud_rate: u32) -> Self {
        Self { baud_rate }
    }
}

impl TransportFactory for SerialTransportFactory {
    fn open_link(&self, identity: &PortIdentity) -> TransportLink {
        let port = SerialWirePort::new(identity.as_str(), self.baud_rate);
        TransportLink::new(identity.clone(), Box::new(port))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
