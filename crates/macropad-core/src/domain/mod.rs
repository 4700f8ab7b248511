//! Identity domain types.
//!
//! Pure value types with no I/O dependencies: the serial-port identity used
//! as the device registry key, and the host name/platform pair sent in the
//! `connect` handshake.

pub mod host;
pub mod identity;
