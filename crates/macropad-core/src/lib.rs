//! # macropad-core
//!
//! Shared library for the macropad host daemon containing the wire protocol
//! and the identity domain types.
//!
//! This crate is used by the host daemon and by anything else that needs to
//! speak the peripheral's wire format (tests, tooling).  It has zero
//! dependencies on OS APIs, serial ports, or schedulers.
//!
//! # Architecture overview (for beginners)
//!
//! A CircuitPython macropad is a small USB keypad with a display.  The host
//! daemon runs on the computer the pad is plugged into and periodically
//! pushes status updates to it over the board's USB CDC data channel: the
//! host's clock time (so the pad can show a clock without its own RTC) and
//! the title of the currently focused window.
//!
//! This crate (`macropad-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How bytes travel over the serial link.  Each message is
//!   one JSON object in pure ASCII followed by a two-byte `\n\r` delimiter,
//!   so the firmware can frame discrete messages on a raw byte stream.
//!
//! - **`domain`** – Identity types with no I/O: [`PortIdentity`], the stable
//!   key that distinguishes one physical device from another across
//!   discovery sweeps, and [`HostIdentity`], the host name + platform pair
//!   announced in the `connect` handshake.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `macropad_core::HostEvent` instead of `macropad_core::protocol::events::HostEvent`.
pub use domain::host::{platform_id, HostIdentity, HostIdentityError};
pub use domain::identity::PortIdentity;
pub use protocol::codec::{decode_frame, encode_frame, CodecError, FRAME_DELIMITER};
pub use protocol::events::HostEvent;
