//! All host → device event types.
//!
//! The peripheral firmware dispatches on the `event` field of each JSON
//! object, so the enum is internally tagged with that exact key.  Field
//! ordering inside the object is irrelevant to the firmware; field presence
//! is guaranteed by the type system (one variant per event kind, each with
//! its own field set).

use serde::{Deserialize, Serialize};

/// All valid host → device events, discriminated by the `event` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Handshake sent once when a device is first registered.
    Connect {
        /// Human-readable machine name of the host.
        host_name: String,
        /// Platform identifier (`win32`, `darwin`, `linux`, …).
        host_os: String,
    },
    /// Periodic clock synchronisation.
    SyncTime {
        /// Seconds since the Unix epoch at the moment of capture.
        timestamp: i64,
    },
    /// The foreground window changed on the host.
    UpdateActiveWindow {
        /// Title of the currently focused window.
        active_window: String,
    },
}

impl HostEvent {
    /// Returns the wire-level `event` tag for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::Connect { .. } => "connect",
            HostEvent::SyncTime { .. } => "sync_time",
            HostEvent::UpdateActiveWindow { .. } => "update_active_window",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_serialized_event_tag() {
        let events = [
            HostEvent::Connect {
                host_name: "HOST1".to_string(),
                host_os: "win32".to_string(),
            },
            HostEvent::SyncTime {
                timestamp: 1_700_000_000,
            },
            HostEvent::UpdateActiveWindow {
                active_window: "Terminal".to_string(),
            },
        ];

        for event in &events {
            let value = serde_json::to_value(event).expect("serialize");
            assert_eq!(
                value.get("event").and_then(|v| v.as_str()),
                Some(event.name()),
                "tag must match name() for {event:?}"
            );
        }
    }

    #[test]
    fn test_sync_time_serializes_timestamp_as_integer() {
        let value = serde_json::to_value(HostEvent::SyncTime {
            timestamp: 1_700_000_000,
        })
        .expect("serialize");
        assert!(value.get("timestamp").expect("timestamp field").is_i64());
    }
}
