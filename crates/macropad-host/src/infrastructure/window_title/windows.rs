//! Windows foreground-window title via the Win32 API.
//!
//! `GetForegroundWindow` returns the window the user is interacting with;
//! `GetWindowTextW` copies its title bar text as UTF-16.  Both calls are
//! cheap and safe to make from any thread.
//!
//! # Implementation notes
//!
//! There may be no foreground window at all (secure desktop, lock screen,
//! or a session that is logging off) — that surfaces as a null handle and
//! is reported as "no title".  Likewise a window with empty title text.

use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW,
};

use super::ActiveWindowProvider;

/// Windows implementation of [`ActiveWindowProvider`].
pub struct WindowsWindowTitleProvider;

impl WindowsWindowTitleProvider {
    /// Creates a new `WindowsWindowTitleProvider`.
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsWindowTitleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveWindowProvider for WindowsWindowTitleProvider {
    fn active_window_title(&self) -> Option<String> {
        foreground_window_title()
    }
}

/// Reads the title of the current foreground window, if any.
fn foreground_window_title() -> Option<String> {
    // SAFETY: GetForegroundWindow takes no arguments and returns a handle we
    // only pass straight back to Win32; a null handle means no foreground
    // window exists right now.
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.is_invalid() {
        return None;
    }

    // SAFETY: `hwnd` came from GetForegroundWindow above.  The length call
    // excludes the NUL terminator; the buffer reserves room for it.
    let length = unsafe { GetWindowTextLengthW(hwnd) };
    if length <= 0 {
        return None;
    }

    let mut buffer = vec![0u16; length as usize + 1];
    // SAFETY: the buffer outlives the call and its length is passed via the
    // slice, so Win32 cannot write out of bounds.
    let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    if copied <= 0 {
        return None;
    }

    let title = String::from_utf16_lossy(&buffer[..copied as usize]);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
