//! DeviceHandle: one registered peripheral and its update bookkeeping.
//!
//! A handle owns the device's [`TransportLink`] and remembers what the
//! device has last been told — the timestamp of the last successful clock
//! sync and the last window title that actually reached the board.  The two
//! `needs_*` predicates derive from that memory, which is what keeps the
//! cadenced fan-outs from re-sending identical data every tick.
//!
//! Cached state only advances on a *successful* send: a failed sync or
//! window update leaves the corresponding "needs" flag raised, so the next
//! scheduled tick naturally retries it.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use macropad_core::{encode_frame, HostEvent, HostIdentity, PortIdentity};
use tracing::error;

use crate::application::transport::TransportLink;

/// How stale a clock sync may get before it is refreshed.
pub const TIME_SYNC_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// One identified peripheral: transport plus last-sent update state.
pub struct DeviceHandle {
    link: TransportLink,
    host: HostIdentity,
    last_time_sync: Option<SystemTime>,
    last_window_title: Option<String>,
}

impl DeviceHandle {
    /// Creates a handle for a newly discovered device.
    pub fn new(link: TransportLink, host: HostIdentity) -> Self {
        Self {
            link,
            host,
            last_time_sync: None,
            last_window_title: None,
        }
    }

    /// Returns the identity of the underlying port.
    pub fn identity(&self) -> &PortIdentity {
        self.link.identity()
    }

    /// Proxies the transport's connected flag.
    pub fn connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Marks the transport connected and sends the `connect` handshake.
    ///
    /// Returns the handshake send result.  Note the asymmetry: the transport
    /// is connected *before* the handshake goes out and is not rolled back if
    /// the send fails — only registry membership is gated on the returned
    /// value.
    pub fn connect(&mut self) -> bool {
        self.link.connect();
        let event = HostEvent::Connect {
            host_name: self.host.name.clone(),
            host_os: self.host.os.clone(),
        };
        self.send_event(&event)
    }

    /// Returns `true` when no sync has ever succeeded, or the last one is at
    /// least [`TIME_SYNC_INTERVAL`] old.
    pub fn needs_time_update(&self) -> bool {
        match self.last_time_sync {
            None => true,
            Some(synced_at) => SystemTime::now() >= synced_at + TIME_SYNC_INTERVAL,
        }
    }

    /// Sends a `sync_time` event carrying the current wall-clock time.
    ///
    /// The time is captured before the send and recorded as the last sync
    /// only when the send succeeds, so a failure leaves the device due on
    /// the next tick.
    pub fn update_time(&mut self) -> bool {
        let now = SystemTime::now();
        let timestamp = now
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default();
        let sent = self.send_event(&HostEvent::SyncTime { timestamp });
        if sent {
            self.last_time_sync = Some(now);
        }
        sent
    }

    /// Returns `true` iff `title` differs from the last successfully sent
    /// title (including when nothing has ever been sent).
    pub fn needs_window_update(&self, title: &str) -> bool {
        self.last_window_title.as_deref() != Some(title)
    }

    /// Sends an `update_active_window` event, recording the title only on
    /// success.
    pub fn update_active_window(&mut self, title: &str) -> bool {
        let event = HostEvent::UpdateActiveWindow {
            active_window: title.to_string(),
        };
        let sent = self.send_event(&event);
        if sent {
            self.last_window_title = Some(title.to_string());
        }
        sent
    }

    /// Encodes `event` and hands the frame to the transport.
    fn send_event(&mut self, event: &HostEvent) -> bool {
        match encode_frame(event) {
            Ok(frame) => self.link.send(&frame),
            Err(e) => {
                error!("failed to encode {} event: {e}", event.name());
                false
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_last_time_sync(&mut self, synced_at: Option<SystemTime>) {
        self.last_time_sync = synced_at;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::serial::mock::ScriptedWirePort;
    use macropad_core::decode_frame;

    fn make_device(port: &ScriptedWirePort) -> DeviceHandle {
        let link = TransportLink::new(PortIdentity::new("COM3"), Box::new(port.clone()));
        DeviceHandle::new(link, HostIdentity::new("HOST1", "win32"))
    }

    #[test]
    fn test_connect_sends_the_handshake_event() {
        // Arrange
        let port = ScriptedWirePort::always_ok();
        let mut device = make_device(&port);

        // Act
        assert!(device.connect());

        // Assert
        let frames = port.sent_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(
            decode_frame(&frames[0]).expect("decode"),
            HostEvent::Connect {
                host_name: "HOST1".to_string(),
                host_os: "win32".to_string(),
            }
        );
    }

    #[test]
    fn test_failed_handshake_leaves_transport_connected() {
        // The transport-connected flag and the handshake result are
        // deliberately independent.
        let port = ScriptedWirePort::failing(1);
        let mut device = make_device(&port);

        assert!(!device.connect());
        assert!(device.connected());
    }

    #[test]
    fn test_time_update_is_due_immediately_after_creation() {
        let port = ScriptedWirePort::always_ok();
        let device = make_device(&port);
        assert!(device.needs_time_update());
    }

    #[test]
    fn test_time_update_is_not_due_after_a_successful_sync() {
        let port = ScriptedWirePort::always_ok();
        let mut device = make_device(&port);
        device.connect();

        assert!(device.update_time());
        assert!(!device.needs_time_update());
    }

    #[test]
    fn test_time_update_becomes_due_after_the_interval_elapses() {
        let port = ScriptedWirePort::always_ok();
        let mut device = make_device(&port);
        device.connect();
        assert!(device.update_time());

        // Simulate the last sync having happened just over an hour ago.
        device.set_last_time_sync(Some(
            SystemTime::now() - (TIME_SYNC_INTERVAL + Duration::from_secs(1)),
        ));

        assert!(device.needs_time_update());
    }

    #[test]
    fn test_failed_time_sync_leaves_the_device_due() {
        let port = ScriptedWirePort::always_ok();
        let mut device = make_device(&port);
        device.connect();

        port.fail_next(1);
        assert!(!device.update_time());
        assert!(device.needs_time_update(), "failed sync must not be cached");
    }

    #[test]
    fn test_sync_time_frame_carries_a_plausible_timestamp() {
        let port = ScriptedWirePort::always_ok();
        let mut device = make_device(&port);
        device.connect();
        port.clear_sent_frames();

        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        assert!(device.update_time());
        let after = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        let frames = port.sent_frames();
        match decode_frame(&frames[0]).expect("decode") {
            HostEvent::SyncTime { timestamp } => {
                assert!(
                    (before..=after).contains(&timestamp),
                    "timestamp {timestamp} outside [{before}, {after}]"
                );
            }
            other => panic!("expected sync_time, got {other:?}"),
        }
    }

    #[test]
    fn test_window_update_is_due_until_a_title_is_sent() {
        let port = ScriptedWirePort::always_ok();
        let mut device = make_device(&port);
        device.connect();

        assert!(device.needs_window_update("Terminal"));
        assert!(device.update_active_window("Terminal"));
        assert!(!device.needs_window_update("Terminal"));
        assert!(device.needs_window_update("Browser"));
    }

    #[test]
    fn test_failed_window_update_is_not_cached() {
        let port = ScriptedWirePort::always_ok();
        let mut device = make_device(&port);
        device.connect();

        port.fail_next(1);
        assert!(!device.update_active_window("Terminal"));
        assert!(
            device.needs_window_update("Terminal"),
            "a failed send must leave the need flag raised"
        );
    }
}
