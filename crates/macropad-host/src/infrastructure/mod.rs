//! Infrastructure layer for the host daemon.
//!
//! Contains OS-facing adapters: serial port enumeration and transmission,
//! the per-platform foreground-window title query, and config-file storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `macropad_core`, but MUST NOT be imported by the `application` layer
//! (test doubles in `serial::mock` and `window_title` are the deliberate
//! exception — they are pure in-memory types compiled on every platform so
//! unit and integration tests share them).

pub mod serial;
pub mod storage;
pub mod window_title;
