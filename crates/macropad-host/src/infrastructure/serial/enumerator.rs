//! CircuitPython board enumeration via the platform serial port list.
//!
//! CircuitPython boards expose their data channel as a USB CDC serial port.
//! The sweep asks the OS for every serial port present and keeps the ones
//! that look like CircuitPython hardware: Adafruit's USB vendor ID, or a
//! product string that names CircuitPython (covers compatible boards from
//! other vendors).
//!
//! Boards running newer firmware enumerate a second CDC interface for the
//! REPL console.  The port list alone cannot always tell the two apart, so a
//! REPL port may be swept up too; the firmware ignores frames it receives on
//! the console, which makes the over-match harmless.
//!
//! Enumeration failure is not fatal — the sweep degrades to "nothing found"
//! with a warning and the next discovery tick retries.

use macropad_core::PortIdentity;
use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, warn};

use crate::application::registry::PortEnumerator;

/// USB vendor ID assigned to Adafruit Industries.
pub const ADAFRUIT_USB_VID: u16 = 0x239A;

/// Production [`PortEnumerator`] backed by the OS serial port list.
pub struct UsbDataPortEnumerator;

impl UsbDataPortEnumerator {
    /// Creates a new `UsbDataPortEnumerator`.
    pub fn new() -> Self {
        Self
    }
}

impl Default for UsbDataPortEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PortEnumerator for UsbDataPortEnumerator {
    fn data_ports(&self) -> Vec<PortIdentity> {
        let ports = match serialport::available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                warn!("serial port enumeration failed: {e}");
                return Vec::new();
            }
        };

        let identities: Vec<PortIdentity> = ports
            .iter()
            .filter(|info| is_circuitpython_port(info))
            .map(|info| PortIdentity::new(info.port_name.clone()))
            .collect();
        debug!(
            "enumerated {} port(s), {} CircuitPython candidate(s)",
            ports.len(),
            identities.len()
        );
        identities
    }
}

/// Returns `true` when a port looks like a CircuitPython board.
fn is_circuitpython_port(info: &SerialPortInfo) -> bool {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            usb.vid == ADAFRUIT_USB_VID
                || usb
                    .product
                    .as_deref()
                    .is_some_and(|product| product.contains("CircuitPython"))
        }
        // PCI/Bluetooth/unknown ports are never macropads.
        _ => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
