//! Async driver for the MCP23017 / MCP23018 16-bit I/O expanders.
//!
//! This crate provides an Embassy-compatible async I2C driver for the
//! Microchip MCP230xx port expanders, exposing the register set as 16-bit
//! masks (port A in the low byte, port B in the high byte).
//!
//! # Architecture
//!
//! The crate is split into two layers:
//!
//! - **`driver`** (crate-private) — register addressing for both bank
//!   layouts and the raw byte transfers.
//! - **[`Mcp230xx`]** (public) — 16-bit register accessors, per-pin
//!   configuration and IOCON handling.
//!
//! # Quick start
//!
//! ```ignore
//! use mcp230xx::{Mcp230xx, DEFAULT_ADDRESS};
//!
//! // Construct with any `embedded-hal-async` I2C implementation
//! let mut expander = Mcp230xx::new(i2c, DEFAULT_ADDRESS);
//! expander.init().await?;
//!
//! // Which pins changed, and what the port looked like when they did
//! let flagged = expander.interrupt_flag().await?;
//! let captured = expander.interrupt_captured().await?;
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on public types
//!   for embedded logging.

#![cfg_attr(not(test), no_std)]

pub use error::ExpanderError;
pub use expander::{IoConfig, Mcp230xx, PinConfig, Port, Variant};
pub use registers::{DEFAULT_ADDRESS, PIN_COUNT};

mod driver;
mod error;
mod expander;
#[cfg(test)]
mod mock;
pub mod registers;
