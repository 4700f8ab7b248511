//! macOS foreground-window title via the Quartz window list.
//!
//! `CGWindowListCopyWindowInfo` returns every on-screen window front-to-back
//! as a CFArray of CFDictionary.  The front-most entry at layer 0 (normal
//! application windows; menu bar, dock and overlays live on other layers) is
//! the focused window, and its `kCGWindowName` value is the title.
//!
//! # Implementation notes
//!
//! `kCGWindowName` is only populated when the process has the Screen
//! Recording permission (macOS 10.15+).  Without it the query still
//! succeeds but every name is absent, which this provider reports as "no
//! title" — the dispatcher then simply skips window ticks, leaving
//! time-sync unaffected.

use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_graphics::window::{
    copy_window_info, kCGNullWindowID, kCGWindowListExcludeDesktopElements,
    kCGWindowListOptionOnScreenOnly,
};

use super::ActiveWindowProvider;

/// macOS implementation of [`ActiveWindowProvider`].
pub struct MacosWindowTitleProvider;

impl MacosWindowTitleProvider {
    /// Creates a new `MacosWindowTitleProvider`.
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosWindowTitleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveWindowProvider for MacosWindowTitleProvider {
    fn active_window_title(&self) -> Option<String> {
        frontmost_window_title()
    }
}

/// Walks the on-screen window list front-to-back and returns the first
/// layer-0 window title.
fn frontmost_window_title() -> Option<String> {
    let windows = copy_window_info(
        kCGWindowListOptionOnScreenOnly | kCGWindowListExcludeDesktopElements,
        kCGNullWindowID,
    )?;

    // The CGWindow dictionary keys are defined by Quartz as the literal
    // strings of their C constant names.
    let layer_key = CFString::from_static_string("kCGWindowLayer");
    let name_key = CFString::from_static_string("kCGWindowName");

    for item in windows.iter() {
        // SAFETY: CGWindowListCopyWindowInfo is documented to return an
        // array of CFDictionary; wrapping under the get rule retains the
        // entry for the duration of this iteration.
        let window: CFDictionary<CFString, CFType> =
            unsafe { CFDictionary::wrap_under_get_rule(*item as CFDictionaryRef) };

        let layer = window
            .find(&layer_key)
            .and_then(|value| value.downcast::<CFNumber>())
            .and_then(|number| number.to_i64());
        if layer != Some(0) {
            continue;
        }

        let title = window
            .find(&name_key)
            .and_then(|value| value.downcast::<CFString>())
            .map(|name| name.to_string());
        match title {
            Some(title) if !title.is_empty() => return Some(title),
            // Unnamed layer-0 windows (or no screen-recording permission):
            // keep scanning toward the back.
            _ => continue,
        }
    }

    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Smoke-test: must not panic with or without a window server session.
    /// Headless CI and permission-less runs legitimately return `None`.
    #[test]
    fn test_macos_title_query_smoke() {
        let provider = MacosWindowTitleProvider::new();
        if let Some(title) = provider.active_window_title() {
            assert!(!title.is_empty(), "a reported title must be non-empty");
        }
    }
}
