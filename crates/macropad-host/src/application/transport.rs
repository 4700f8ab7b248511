//! TransportLink: the per-device send path and its circuit breaker.
//!
//! Every send is a self-contained open-write-close against the underlying
//! port, delegated to a [`WirePort`].  The link itself only tracks two pieces
//! of state:
//!
//! - `connected` – whether the device is still part of the live set.
//! - `error_count` – consecutive failed sends since the last success.
//!
//! # Failure policy
//!
//! A single failed write is routine (the board may be rebooting, or the user
//! unplugged it mid-frame) and is recovered by the next scheduled tick — the
//! link never retries on its own.  Only a *run* of failures means the device
//! is really gone: after [`MAX_ERROR_COUNT`] + 1 consecutive failures the
//! link flips to disconnected and stays there.  Reconnection happens through
//! a fresh handle when discovery sees the port again after a process restart,
//! not by reviving this one.

use std::io;

use macropad_core::PortIdentity;
use tracing::{debug, error, info, warn};

/// Consecutive send failures tolerated before a link is retired.
pub const MAX_ERROR_COUNT: u32 = 5;

/// One scoped transmission to a physical port.
///
/// Implementations must open the underlying transport, write `payload` as a
/// single contiguous buffer, and close the transport again before returning —
/// on the error path too, so no OS handle leaks across ticks.
pub trait WirePort {
    /// Performs one open-write-close cycle.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; the caller translates it into
    /// circuit-breaker state.
    fn transmit(&mut self, payload: &[u8]) -> io::Result<()>;
}

/// A live serial connection to one device, with its error-threshold breaker.
pub struct TransportLink {
    identity: PortIdentity,
    port: Box<dyn WirePort>,
    connected: bool,
    error_count: u32,
}

impl TransportLink {
    /// Creates a link in the not-yet-connected state.
    pub fn new(identity: PortIdentity, port: Box<dyn WirePort>) -> Self {
        Self {
            identity,
            port,
            connected: false,
            error_count: 0,
        }
    }

    /// Returns the identity of the port this link writes to.
    pub fn identity(&self) -> &PortIdentity {
        &self.identity
    }

    /// Returns whether the link is part of the live set.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Marks the link connected.  Local side effect only — the handshake
    /// payload is the caller's responsibility.
    pub fn connect(&mut self) {
        info!("connected to new device: {}", self.identity);
        self.connected = true;
    }

    /// Sends one frame, returning whether the write succeeded.
    ///
    /// Fails fast without touching the port when the link is disconnected.
    /// A success resets the error counter; a failure increments it and, past
    /// [`MAX_ERROR_COUNT`], retires the link.
    pub fn send(&mut self, payload: &[u8]) -> bool {
        if !self.connected {
            return false;
        }

        debug!(
            "{} :: {}",
            self.identity,
            String::from_utf8_lossy(payload).trim_end()
        );
        match self.port.transmit(payload) {
            Ok(()) => {
                self.error_count = 0;
                true
            }
            Err(e) => {
                warn!("write to {} failed: {e}", self.identity);
                self.error_count += 1;
                if self.error_count > MAX_ERROR_COUNT {
                    self.connected = false;
                    error!(
                        "{} exceeded {MAX_ERROR_COUNT} consecutive errors; disconnecting device",
                        self.identity
                    );
                }
                false
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::serial::mock::ScriptedWirePort;

    fn make_link(port: &ScriptedWirePort) -> TransportLink {
        TransportLink::new(PortIdentity::new("COM3"), Box::new(port.clone()))
    }

    #[test]
    fn test_send_fails_fast_when_never_connected() {
        // Arrange
        let port = ScriptedWirePort::always_ok();
        let mut link = make_link(&port);

        // Act / Assert: no transmit is attempted before connect().
        assert!(!link.send(b"payload"));
        assert_eq!(port.attempts(), 0);
    }

    #[test]
    fn test_send_succeeds_after_connect() {
        let port = ScriptedWirePort::always_ok();
        let mut link = make_link(&port);
        link.connect();

        assert!(link.send(b"payload"));
        assert_eq!(port.attempts(), 1);
        assert_eq!(port.sent_frames(), vec![b"payload".to_vec()]);
    }

    #[test]
    fn test_sixth_consecutive_failure_disconnects_the_link() {
        // Arrange
        let port = ScriptedWirePort::failing(6);
        let mut link = make_link(&port);
        link.connect();

        // Act: five failures are tolerated...
        for _ in 0..5 {
            assert!(!link.send(b"x"));
            assert!(link.is_connected(), "five failures must not disconnect");
        }
        // ...the sixth trips the breaker.
        assert!(!link.send(b"x"));

        // Assert
        assert!(!link.is_connected());
        assert_eq!(port.attempts(), 6);
    }

    #[test]
    fn test_disconnected_link_never_attempts_another_write() {
        let port = ScriptedWirePort::failing(6);
        let mut link = make_link(&port);
        link.connect();
        for _ in 0..6 {
            link.send(b"x");
        }
        assert!(!link.is_connected());

        // The seventh call returns false without reaching the port.
        assert!(!link.send(b"x"));
        assert_eq!(port.attempts(), 6);
    }

    #[test]
    fn test_success_resets_the_error_counter() {
        // Arrange: five failures, one success, then five more failures.
        let port = ScriptedWirePort::always_ok();
        port.fail_next(5);
        let mut link = make_link(&port);
        link.connect();

        for _ in 0..5 {
            assert!(!link.send(b"x"));
        }
        assert!(link.send(b"x"), "scripted failures exhausted");

        // Act: failures are not banked across the success.
        port.fail_next(5);
        for _ in 0..5 {
            assert!(!link.send(b"x"));
        }

        // Assert
        assert!(
            link.is_connected(),
            "five failures after a success must not disconnect"
        );
    }
}
