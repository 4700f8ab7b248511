//! Wire protocol spoken to the macropad peripheral.
//!
//! - **`events`** – the closed set of typed messages the host can send.
//! - **`codec`** – the single encoder/decoder pair: one ASCII JSON object
//!   per message, terminated by a two-byte `\n\r` delimiter.

pub mod codec;
pub mod events;
