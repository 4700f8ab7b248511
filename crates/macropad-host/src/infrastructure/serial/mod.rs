//! Serial adapters: board enumeration and scoped frame transmission.
//!
//! - **`enumerator`** – finds the USB CDC data ports of attached
//!   CircuitPython boards via the platform port list.
//! - **`port`** – the production [`WirePort`](crate::application::transport::WirePort)
//!   implementation: open, write one frame, close.
//! - **`mock`** – scripted in-memory doubles for all serial seams, compiled
//!   unconditionally so tests on any machine run without hardware.

pub mod enumerator;
pub mod mock;
pub mod port;

pub use enumerator::UsbDataPortEnumerator;
pub use port::{SerialTransportFactory, SerialWirePort};
