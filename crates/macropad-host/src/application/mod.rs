//! Application layer use cases for the host daemon.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure value types, here in `macropad-core`) and the infrastructure
//! (serial ports, OS window queries, config files).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a goal (e.g., "push a clock
//!   sync to every live device whose last sync is stale").
//! - **Depend on abstractions** (traits) rather than concrete
//!   implementations, so the serial stack and OS queries can be swapped for
//!   scripted doubles in tests.
//! - **Contain no OS calls, no serial I/O, no file system access**.
//!
//! # Sub-modules
//!
//! - **`transport`** – One serial link per device: the scoped send path and
//!   the consecutive-error circuit breaker that retires flaky devices.
//!
//! - **`device`** – One registered peripheral: the connect handshake and the
//!   "is a time sync / window update due?" decision state.
//!
//! - **`registry`** – The in-memory map of every device ever discovered in
//!   this process, and the discovery sweep that grows it.
//!
//! - **`dispatcher`** – The three cadenced operations the tick loop invokes:
//!   discovery, time-sync fan-out, and window-title fan-out.

pub mod device;
pub mod dispatcher;
pub mod registry;
pub mod transport;
