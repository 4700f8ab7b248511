//! Stable identity for a physical serial-connected device.
//!
//! Discovery enumerates the attached boards on every sweep, and the registry
//! must recognise a board it has already connected to.  Platform enumeration
//! libraries return their own port-info structs, so instead of keying the
//! registry on a library type we reduce each device to the one stable datum
//! the OS guarantees: the canonical port path (`/dev/ttyACM0`, `COM3`).
//!
//! A `PortIdentity` is immutable for the lifetime of its device handle and
//! compares/hashes structurally, which makes it usable as a `HashMap` key.

use std::fmt;

/// Opaque, comparable token for one physical serial port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortIdentity(String);

impl PortIdentity {
    /// Creates an identity from a canonical port path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the port path this identity wraps.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortIdentity {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for PortIdentity {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
