//! Scripted in-memory doubles for the serial seams.
//!
//! These are compiled unconditionally (no `#[cfg(test)]` guard) so unit
//! tests, integration tests, and hardware-less development all share the
//! same doubles.  Each type is a cheap handle around shared state: cloning
//! one yields another view of the *same* script and logs, which is what lets
//! a test keep inspecting a port after moving a clone into the registry.
//!
//! # Example
//!
//! ```ignore
//! let port = ScriptedWirePort::always_ok();
//! factory.register(PortIdentity::new("COM3"), port.clone());
//! // ... run the dispatcher ...
//! assert_eq!(port.sent_frames().len(), 1);
//! ```

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use macropad_core::PortIdentity;

use crate::application::registry::{PortEnumerator, TransportFactory};
use crate::application::transport::{TransportLink, WirePort};

// ── ScriptedWirePort ──────────────────────────────────────────────────────────

#[derive(Default)]
struct WireScript {
    /// Number of upcoming transmits that must fail.
    failures_remaining: usize,
    /// Total transmit calls, including failed ones.
    attempts: usize,
    /// Payloads of the successful transmits, in order.
    sent: Vec<Vec<u8>>,
}

/// A [`WirePort`] whose failures are scripted by the test.
#[derive(Clone, Default)]
pub struct ScriptedWirePort {
    state: Arc<Mutex<WireScript>>,
}

impl ScriptedWirePort {
    /// A port on which every transmit succeeds.
    pub fn always_ok() -> Self {
        Self::default()
    }

    /// A port whose first `failures` transmits fail, then succeed.
    pub fn failing(failures: usize) -> Self {
        let port = Self::default();
        port.fail_next(failures);
        port
    }

    /// Scripts the next `failures` transmits to fail.
    pub fn fail_next(&self, failures: usize) {
        self.state.lock().unwrap().failures_remaining = failures;
    }

    /// Total transmit calls so far, including failures.
    pub fn attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }

    /// Payloads of every successful transmit, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Forgets previously recorded frames (attempt count is kept).
    pub fn clear_sent_frames(&self) {
        self.state.lock().unwrap().sent.clear();
    }
}

impl WirePort for ScriptedWirePort {
    fn transmit(&mut self, payload: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.attempts += 1;
        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted transmit failure",
            ));
        }
        state.sent.push(payload.to_vec());
        Ok(())
    }
}

// ── ScriptedPortEnumerator ────────────────────────────────────────────────────

/// A [`PortEnumerator`] returning a test-controlled set of identities.
#[derive(Clone, Default)]
pub struct ScriptedPortEnumerator {
    ports: Arc<Mutex<Vec<PortIdentity>>>,
}

impl ScriptedPortEnumerator {
    /// Creates an enumerator that currently sees `paths`.
    pub fn new(paths: &[&str]) -> Self {
        let enumerator = Self::default();
        enumerator.set_ports(paths);
        enumerator
    }

    /// Replaces the enumerated set, simulating plug/unplug between sweeps.
    pub fn set_ports(&self, paths: &[&str]) {
        *self.ports.lock().unwrap() = paths.iter().map(|path| PortIdentity::new(*path)).collect();
    }
}

impl PortEnumerator for ScriptedPortEnumerator {
    fn data_ports(&self) -> Vec<PortIdentity> {
        self.ports.lock().unwrap().clone()
    }
}

// ── ScriptedTransportFactory ──────────────────────────────────────────────────

#[derive(Default)]
struct FactoryState {
    ports: HashMap<PortIdentity, ScriptedWirePort>,
    open_counts: HashMap<PortIdentity, usize>,
}

/// A [`TransportFactory`] handing out scripted ports and counting builds.
///
/// Identities without a registered port get an always-succeeding one on
/// first use; either way the same shared port state is reused for repeat
/// builds of the same identity, so scripted failures span reconnects.
#[derive(Clone, Default)]
pub struct ScriptedTransportFactory {
    state: Arc<Mutex<FactoryState>>,
}

impl ScriptedTransportFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-registers the port to hand out for `identity`.
    pub fn register(&self, identity: PortIdentity, port: ScriptedWirePort) {
        self.state.lock().unwrap().ports.insert(identity, port);
    }

    /// How many links have been built for `identity`.
    pub fn open_count(&self, identity: &PortIdentity) -> usize {
        self.state
            .lock()
            .unwrap()
            .open_counts
            .get(identity)
            .copied()
            .unwrap_or(0)
    }
}

impl TransportFactory for ScriptedTransportFactory {
    fn open_link(&self, identity: &PortIdentity) -> TransportLink {
        let mut state = self.state.lock().unwrap();
        *state.open_counts.entry(identity.clone()).or_insert(0) += 1;
        let port = state
            .ports
            .entry(identity.clone())
            .or_insert_with(ScriptedWirePort::always_ok)
            .clone();
        TransportLink::new(identity.clone(), Box::new(port))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_port_records_successful_payloads() {
        let mut port = ScriptedWirePort::always_ok();
        port.transmit(b"one").expect("ok");
        port.transmit(b"two").expect("ok");

        assert_eq!(port.sent_frames(), vec![b"one".to_vec(), b"two".to_vec()]);
        assert_eq!(port.attempts(), 2);
    }

    #[test]
    fn test_scripted_failures_are_consumed_in_order() {
        let mut port = ScriptedWirePort::failing(2);
        assert!(port.transmit(b"a").is_err());
        assert!(port.transmit(b"b").is_err());
        assert!(port.transmit(b"c").is_ok());

        // Failed payloads are not recorded as sent.
        assert_eq!(port.sent_frames(), vec![b"c".to_vec()]);
        assert_eq!(port.attempts(), 3);
    }

    #[test]
    fn test_clones_share_the_same_script_state() {
        let port = ScriptedWirePort::always_ok();
        let mut moved_view = port.clone();
        moved_view.transmit(b"frame").expect("ok");

        assert_eq!(port.sent_frames(), vec![b"frame".to_vec()]);
    }

    #[test]
    fn test_factory_reuses_shared_port_state_across_builds() {
        let factory = ScriptedTransportFactory::new();
        let identity = PortIdentity::new("COM3");
        let port = ScriptedWirePort::failing(1);
        factory.register(identity.clone(), port.clone());

        let mut first = factory.open_link(&identity);
        let mut second = factory.open_link(&identity);
        first.connect();
        second.connect();

        // The scripted failure is consumed by whichever link sends first.
        assert!(!first.send(b"x"));
        assert!(second.send(b"x"));
        assert_eq!(factory.open_count(&identity), 2);
        assert_eq!(port.attempts(), 2);
    }

    #[test]
    fn test_enumerator_set_can_change_between_sweeps() {
        let enumerator = ScriptedPortEnumerator::new(&["COM3"]);
        assert_eq!(enumerator.data_ports(), vec![PortIdentity::new("COM3")]);

        enumerator.set_ports(&["COM3", "COM7"]);
        assert_eq!(enumerator.data_ports().len(), 2);
    }
}
