//! Interrupt-driven quadrature rotary encoder on an I/O expander.
//!
//! Decodes a mechanical rotary encoder (and its push button) wired to a
//! 16-bit I/O expander such as the MCP23017. The expander latches pin
//! changes and pulls its INT output low; each interrupt yields at most one
//! logical event: a single detent step or a button report.
//!
//! # Architecture
//!
//! - **[`Decoder`]** — pure state: the quadrature history register, the
//!   bounded counter, the button level and the change sink.
//! - **[`PortRegisters`]** — the 16-bit registers the encoder needs from the
//!   expander. Implemented for [`mcp230xx::Mcp230xx`] with the `mcp230xx`
//!   feature.
//! - **[`RotaryEncoder`]** — arms the pins, owns the INT line binding
//!   ([`start`](RotaryEncoder::start) / [`stop`](RotaryEncoder::stop)) and
//!   dispatches interrupts into the decoder.
//!
//! # Quick start
//!
//! ```ignore
//! use mcp230xx::{Mcp230xx, DEFAULT_ADDRESS};
//! use rotary_encoder::{EncoderConfig, PinAssignment, RotaryEncoder};
//!
//! let expander = Mcp230xx::new(i2c, DEFAULT_ADDRESS);
//! let config = EncoderConfig::new(PinAssignment::new(0, 1).with_switch(2));
//!
//! let mut encoder = RotaryEncoder::new(expander, int_pin, config, ()).await?;
//! encoder.start().await?;
//!
//! loop {
//!     if let Some(event) = encoder.next_event().await? {
//!         // ...
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **`mcp230xx`** *(default)* — [`PortRegisters`] for the `mcp230xx` driver.
//! - **`defmt`** — structured logging and [`defmt::Format`] on public types.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod notify;
pub mod port;

#[cfg(test)]
mod mock;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use config::{EncoderConfig, PinAssignment};
pub use decoder::{Decoder, Direction, Event};
pub use encoder::RotaryEncoder;
pub use error::RotaryError;
pub use notify::OnChange;
pub use port::{ConfigRegister, PortRegisters};
