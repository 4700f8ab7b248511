//! Host name and platform identity announced to each device.
//!
//! The `connect` handshake tells the peripheral which computer it is plugged
//! into (`host_name`) and which operating system that computer runs
//! (`host_os`), so the firmware can adjust what it displays.  Both values are
//! resolved once at process startup and passed through unmodified for the
//! lifetime of the daemon.
//!
//! The platform string uses the identifiers the deployed firmware already
//! understands: `"win32"`, `"darwin"`, and `"linux"`.  A missing host name is
//! a startup error — the daemon refuses to run degraded and announce devices
//! with an empty name.

use std::env;

use thiserror::Error;

/// Error type for host identity resolution.
#[derive(Debug, Error, PartialEq)]
pub enum HostIdentityError {
    /// The environment variable that names this host is not set.
    #[error("host name unavailable: the {var} environment variable is not set")]
    MissingHostName { var: &'static str },
}

/// Host name + platform pair included in every `connect` handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Human-readable machine name (e.g. `DESKTOP-AB12CD`).
    pub name: String,
    /// Platform identifier string (`win32`, `darwin`, `linux`, …).
    pub os: String,
}

impl HostIdentity {
    /// Creates an identity from explicit values (used by tests and by the
    /// config-file override).
    pub fn new(name: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            os: os.into(),
        }
    }

    /// Resolves the identity from the process environment.
    ///
    /// The host name comes from `COMPUTERNAME` on Windows and `HOSTNAME`
    /// elsewhere; the platform string from [`platform_id`].
    ///
    /// # Errors
    ///
    /// Returns [`HostIdentityError::MissingHostName`] when the variable is
    /// unset, which callers must treat as fatal at startup.
    pub fn from_env() -> Result<Self, HostIdentityError> {
        let var = host_name_var();
        let name = read_env_var(var)?;
        Ok(Self {
            name,
            os: platform_id().to_string(),
        })
    }
}

/// Returns the platform identifier string for the current build target.
///
/// The firmware predates this daemon and matches on the identifiers its
/// previous host tooling sent, so the Rust OS names are mapped onto those:
///
/// | `std::env::consts::OS` | wire value |
/// |------------------------|------------|
/// | `windows`              | `win32`    |
/// | `macos`                | `darwin`   |
/// | anything else          | unchanged  |
pub fn platform_id() -> &'static str {
    match env::consts::OS {
        "windows" => "win32",
        "macos" => "darwin",
        other => other,
    }
}

/// Name of the environment variable that carries the machine name.
fn host_name_var() -> &'static str {
    if cfg!(windows) {
        "COMPUTERNAME"
    } else {
        "HOSTNAME"
    }
}

/// Reads `var`, treating an unset or empty value as missing.
fn read_env_var(var: &'static str) -> Result<String, HostIdentityError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(HostIdentityError::MissingHostName { var }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_id_is_a_known_wire_value_on_this_target() {
        let id = platform_id();
        // The mapped names must never leak the Rust-side spelling.
        assert_ne!(id, "windows");
        assert_ne!(id, "macos");
        assert!(!id.is_empty());
    }

    #[test]
    fn test_read_env_var_errors_when_variable_is_unset() {
        // A name no environment will plausibly define.
        let result = read_env_var("MACROPAD_HOST_NO_SUCH_VARIABLE");
        assert_eq!(
            result,
            Err(HostIdentityError::MissingHostName {
                var: "MACROPAD_HOST_NO_SUCH_VARIABLE"
            })
        );
    }

    #[test]
    fn test_read_env_var_returns_value_when_set() {
        // PATH is set in any test environment worth supporting.
        let result = read_env_var("PATH");
        assert!(result.is_ok(), "PATH must be readable: {result:?}");
    }

    #[test]
    fn test_new_takes_explicit_name_and_os() {
        let host = HostIdentity::new("HOST1", "win32");
        assert_eq!(host.name, "HOST1");
        assert_eq!(host.os, "win32");
    }
}
