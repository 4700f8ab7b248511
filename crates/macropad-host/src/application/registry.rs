//! DeviceRegistry: discovery sweeps and the map of known devices.
//!
//! The registry is the daemon's in-memory database of every macropad it has
//! seen since the process started.  Each entry tracks one [`DeviceHandle`]
//! keyed by its [`PortIdentity`].
//!
//! # Registry lifecycle (for beginners)
//!
//! ```text
//! enumerated ──► handshake ──► registered ──► live ──► retired
//!                   │                          (breaker open)
//!                   └─ failed: not registered; retried next sweep
//! ```
//!
//! - A port the registry has never seen gets a fresh handle and one
//!   `connect()` attempt.  Only a successful handshake registers it; a
//!   failure leaves the port unknown so the next sweep tries again.
//! - A port already in the map is left completely untouched, even if its
//!   transport has since been retired — entries are never replaced or
//!   removed while the process lives.  A retired device simply drops out of
//!   the live view.
//!
//! # HashMap choice
//!
//! `HashMap<PortIdentity, DeviceHandle>` gives O(1) "have I seen this port?"
//! checks during sweeps.  Iteration order is not guaranteed, which is fine —
//! update fan-out does not care which device is served first.

use std::collections::HashMap;

use macropad_core::{HostIdentity, PortIdentity};
use tracing::debug;

use crate::application::device::DeviceHandle;
use crate::application::transport::TransportLink;

/// Enumerates the data ports of currently attached macropad boards.
pub trait PortEnumerator {
    /// Returns the identities present right now.  Implementations should
    /// degrade to an empty sweep (not panic) when the platform query fails;
    /// the next sweep retries naturally.
    fn data_ports(&self) -> Vec<PortIdentity>;
}

/// Builds a transport link for a newly discovered identity.
pub trait TransportFactory {
    /// Creates the (not yet connected) link for `identity`.
    fn open_link(&self, identity: &PortIdentity) -> TransportLink;
}

/// In-memory map of all devices discovered during this process lifetime.
pub struct DeviceRegistry {
    devices: HashMap<PortIdentity, DeviceHandle>,
    enumerator: Box<dyn PortEnumerator>,
    factory: Box<dyn TransportFactory>,
    host: HostIdentity,
}

impl DeviceRegistry {
    /// Creates an empty registry with its discovery collaborators.
    pub fn new(
        enumerator: Box<dyn PortEnumerator>,
        factory: Box<dyn TransportFactory>,
        host: HostIdentity,
    ) -> Self {
        Self {
            devices: HashMap::new(),
            enumerator,
            factory,
            host,
        }
    }

    /// Runs one discovery sweep, registering any new identity whose
    /// handshake succeeds.
    pub fn refresh_discovery(&mut self) {
        for identity in self.enumerator.data_ports() {
            if self.devices.contains_key(&identity) {
                continue;
            }

            let link = self.factory.open_link(&identity);
            let mut device = DeviceHandle::new(link, self.host.clone());
            if device.connect() {
                self.devices.insert(identity, device);
            } else {
                debug!("handshake with {identity} failed; will retry next sweep");
            }
        }
    }

    /// Iterates the registered devices whose transport is still connected.
    pub fn live_devices_mut(&mut self) -> impl Iterator<Item = &mut DeviceHandle> {
        self.devices.values_mut().filter(|device| device.connected())
    }

    /// Number of devices ever registered (live or retired).
    pub fn registered_count(&self) -> usize {
        self.devices.len()
    }

    /// Number of devices currently in the live set.
    pub fn live_count(&self) -> usize {
        self.devices.values().filter(|d| d.connected()).count()
    }

    /// Returns whether `identity` has been registered.
    pub fn contains(&self, identity: &PortIdentity) -> bool {
        self.devices.contains_key(identity)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
