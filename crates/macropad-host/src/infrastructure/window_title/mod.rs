//! Platform-specific foreground-window title queries.
//!
//! The window-sync cadence asks "what window is focused right now?" and
//! pushes the answer to every device whose last-seen title differs.  This
//! module supplies that answer per platform.
//!
//! # Platform implementations
//!
//! Each platform implements
//! [`ActiveWindowProvider`](crate::application::dispatcher::ActiveWindowProvider);
//! the correct one is selected at compile time via `#[cfg(target_os = ...)]`
//! and re-exported as `NativeWindowTitleProvider`:
//!
//! | Module        | OS      | API used                                        |
//! |---------------|---------|-------------------------------------------------|
//! | `windows`     | Windows | `GetForegroundWindow` + `GetWindowTextW`        |
//! | `macos`       | macOS   | `CGWindowListCopyWindowInfo` (front-most window)|
//! | (unsupported) | other   | always reports no title                         |
//!
//! Linux and the BSDs have no single windowing API worth binding here (X11
//! vs. a dozen Wayland compositors), so those hosts run time-sync only —
//! "no title" is an ordinary answer the dispatcher treats as a skipped tick,
//! not an error.
//!
//! A [`MockWindowTitleProvider`] is always compiled (not guarded by
//! `#[cfg]`) so tests on any platform can script focus changes.

use std::sync::{Arc, Mutex};

use crate::application::dispatcher::ActiveWindowProvider;

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

/// Re-export the Windows provider as `NativeWindowTitleProvider` on Windows.
///
/// This alias lets the rest of the codebase reference
/// `NativeWindowTitleProvider` without knowing the OS at compile time — only
/// this module contains the platform-conditional logic.
#[cfg(target_os = "windows")]
pub use self::windows::WindowsWindowTitleProvider as NativeWindowTitleProvider;

// ── macOS implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "macos")]
pub mod macos;

/// Re-export the macOS provider as `NativeWindowTitleProvider` on macOS.
#[cfg(target_os = "macos")]
pub use self::macos::MacosWindowTitleProvider as NativeWindowTitleProvider;

// ── Unsupported platforms ─────────────────────────────────────────────────────

/// Provider for platforms without a foreground-window query: always `None`.
pub struct UnsupportedWindowTitleProvider;

impl UnsupportedWindowTitleProvider {
    /// Creates a new `UnsupportedWindowTitleProvider`.
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnsupportedWindowTitleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveWindowProvider for UnsupportedWindowTitleProvider {
    fn active_window_title(&self) -> Option<String> {
        None
    }
}

/// Re-export the no-op provider as `NativeWindowTitleProvider` elsewhere.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub use self::UnsupportedWindowTitleProvider as NativeWindowTitleProvider;

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A window query whose answer is scripted by the test.
///
/// Cloning yields another handle onto the same scripted title, so a test can
/// keep changing the "focused window" after moving a clone into the
/// dispatcher.
#[derive(Clone, Default)]
pub struct MockWindowTitleProvider {
    title: Arc<Mutex<Option<String>>>,
}

impl MockWindowTitleProvider {
    /// Creates a provider that initially reports no focused window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the title the provider reports (`None` = no focused window).
    pub fn set_title(&self, title: Option<&str>) {
        *self.title.lock().unwrap() = title.map(str::to_string);
    }
}

impl ActiveWindowProvider for MockWindowTitleProvider {
    fn active_window_title(&self) -> Option<String> {
        self.title.lock().unwrap().clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
