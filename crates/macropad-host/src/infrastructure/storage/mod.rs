//! File-system storage for the host daemon.
//!
//! Currently just the TOML configuration loader; the daemon keeps no other
//! persistent state (the device registry is rebuilt from scratch on every
//! start).

pub mod config;
