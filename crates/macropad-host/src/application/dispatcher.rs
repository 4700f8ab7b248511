//! UpdateDispatcher: the three cadenced operations driven by the tick loop.
//!
//! The dispatcher owns the [`DeviceRegistry`] for the whole process lifetime
//! and exposes one entry point per cadence:
//!
//! | operation               | default cadence | work                            |
//! |-------------------------|-----------------|---------------------------------|
//! | `dispatch_discovery`    | 5 s             | registry sweep for new boards   |
//! | `dispatch_time_sync`    | 60 s            | clock sync to stale devices     |
//! | `dispatch_window_sync`  | 2 s             | title push to out-of-date devices |
//!
//! The operations share no mutable state beyond the registry map itself,
//! which discovery alone grows and the fan-outs only iterate.  Send results
//! are deliberately ignored here: the transport's circuit breaker is the
//! only escalation policy, and the per-device "needs" flags make the next
//! tick retry anything that failed.

use tracing::debug;

use crate::application::registry::DeviceRegistry;

/// Supplies the title of the host's current foreground window.
///
/// Returns `None` on platforms without a usable query, and when no window
/// has focus.  Absence is not an error — the tick is simply skipped.
pub trait ActiveWindowProvider {
    fn active_window_title(&self) -> Option<String>;
}

/// Orchestrates discovery and the two update fan-outs over the live set.
pub struct UpdateDispatcher {
    registry: DeviceRegistry,
    window: Box<dyn ActiveWindowProvider>,
}

impl UpdateDispatcher {
    /// Creates a dispatcher around an owned registry and window query.
    pub fn new(registry: DeviceRegistry, window: Box<dyn ActiveWindowProvider>) -> Self {
        Self { registry, window }
    }

    /// Sweeps for newly attached devices.
    pub fn dispatch_discovery(&mut self) {
        self.registry.refresh_discovery();
    }

    /// Pushes a clock sync to every live device whose last sync is stale.
    pub fn dispatch_time_sync(&mut self) {
        for device in self.registry.live_devices_mut() {
            if device.needs_time_update() {
                device.update_time();
            }
        }
    }

    /// Pushes the current foreground window title to every live device that
    /// has not already received it.
    pub fn dispatch_window_sync(&mut self) {
        let Some(title) = self.window.active_window_title() else {
            return;
        };
        if title.is_empty() {
            debug!("window query returned an empty title; skipping tick");
            return;
        }

        for device in self.registry.live_devices_mut() {
            if device.needs_window_update(&title) {
                device.update_active_window(&title);
            }
        }
    }

    /// Read access to the registry, for status reporting and tests.
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
