//! MCP230xx register address constants.
//!
//! Addresses are given in the bank=1, port A numbering (`0x00..=0x0A`).
//! The driver translates them to the physical address for the active bank
//! and port:
//!
//! - Bank 0 (power-on default): `(register << 1) + port`
//! - Bank 1: `register | (port << 4)`

// ---------------------------------------------------------------------------
// Register map
// ---------------------------------------------------------------------------

/// I/O direction (1 = input, 0 = output).
pub const IODIR: u8 = 0x00;

/// Input polarity (1 = GPIO bit reflects the inverted pin level).
pub const IPOL: u8 = 0x01;

/// Interrupt-on-change enable.
pub const GPINTEN: u8 = 0x02;

/// Default compare value for interrupt-on-change.
pub const DEFVAL: u8 = 0x03;

/// Interrupt-on-change control (1 = compare against DEFVAL, 0 = previous value).
pub const INTCON: u8 = 0x04;

/// Configuration register. Shared between both ports.
pub const IOCON: u8 = 0x05;

/// Weak pull-up enable.
pub const GPPU: u8 = 0x06;

/// Interrupt flag (read-only).
pub const INTF: u8 = 0x07;

/// Port value captured at the time of the interrupt (read-only).
/// Reading this register clears the interrupt.
pub const INTCAP: u8 = 0x08;

/// General purpose I/O port.
pub const GPIO: u8 = 0x09;

/// Output latch.
pub const OLAT: u8 = 0x0A;

// ---------------------------------------------------------------------------
// IOCON bits
// ---------------------------------------------------------------------------

/// Interrupt clearing control (MCP23018 only): 1 = reading INTCAP clears.
pub const IOCON_INTCC: u8 = 1 << 0;

/// INT output polarity: 1 = active-high.
pub const IOCON_INTPOL: u8 = 1 << 1;

/// INT output as open drain (overrides INTPOL).
pub const IOCON_ODR: u8 = 1 << 2;

/// SDA slew rate control disabled (MCP23017 only).
pub const IOCON_DISSLW: u8 = 1 << 4;

/// Sequential operation disabled (address pointer does not increment).
pub const IOCON_SEQOP: u8 = 1 << 5;

/// INTA and INTB internally connected.
pub const IOCON_MIRROR: u8 = 1 << 6;

/// Register bank layout: 1 = all port A registers followed by port B.
pub const IOCON_BANK: u8 = 1 << 7;

// ---------------------------------------------------------------------------
// Device constants
// ---------------------------------------------------------------------------

/// Default I2C address with A0..A2 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

/// Number of GPIO pins across both ports.
pub const PIN_COUNT: u8 = 16;
