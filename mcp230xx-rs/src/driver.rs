//! Low-level register driver.
//!
//! Translates logical register numbers into physical addresses for the
//! active bank layout and performs the single-byte I2C transfers.
//!
//! This module is crate-private — consumers interact with [`Mcp230xx`]
//! in `expander.rs` instead.
//!
//! [`Mcp230xx`]: crate::Mcp230xx

use embedded_hal_async::i2c::I2c;

use crate::error::ExpanderError;
use crate::expander::Port;
use crate::registers::{IOCON, IOCON_BANK};

/// Low-level MCP230xx register driver.
///
/// Owns an I2C peripheral and keeps a copy of the IOCON register so that
/// register addresses follow the configured bank layout.
pub(crate) struct RegisterDriver<I2C> {
    i2c: I2C,
    address: u8,
    io_config: u8,
}

impl<I2C> RegisterDriver<I2C>
where
    I2C: I2c,
{
    /// Create a new register driver.
    ///
    /// Assumes the power-on bank layout (IOCON = 0) until IOCON is written.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            io_config: 0,
        }
    }

    /// Last IOCON value written through this driver.
    pub fn io_config(&self) -> u8 {
        self.io_config
    }

    /// Release the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }

    #[cfg(test)]
    pub fn bus_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Physical address of `register` on `port` for the active bank layout.
    pub fn physical_address(&self, register: u8, port: Port) -> u8 {
        let port = port as u8;
        if self.io_config & IOCON_BANK != 0 {
            register | (port << 4)
        } else {
            (register << 1) + port
        }
    }

    // -----------------------------------------------------------------------
    // 8-bit primitives
    // -----------------------------------------------------------------------

    /// Read one port's copy of `register`.
    pub async fn read_u8(
        &mut self,
        register: u8,
        port: Port,
    ) -> Result<u8, ExpanderError<I2C::Error>> {
        let address = self.physical_address(register, port);
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[address], &mut buf).await?;
        Ok(buf[0])
    }

    /// Write one port's copy of `register`.
    ///
    /// Writing IOCON also updates the cached copy, so subsequent accesses
    /// use the new bank layout.
    pub async fn write_u8(
        &mut self,
        register: u8,
        port: Port,
        value: u8,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        let address = self.physical_address(register, port);
        self.i2c.write(self.address, &[address, value]).await?;

        if register == IOCON {
            self.io_config = value;
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // 16-bit helpers (port A = low byte, port B = high byte)
    // -----------------------------------------------------------------------

    /// Read `register` from both ports as one 16-bit mask.
    pub async fn read_u16(&mut self, register: u8) -> Result<u16, ExpanderError<I2C::Error>> {
        let low = self.read_u8(register, Port::A).await?;
        let high = self.read_u8(register, Port::B).await?;
        Ok(u16::from(low) | (u16::from(high) << 8))
    }

    /// Write a 16-bit mask to `register` on both ports.
    pub async fn write_u16(
        &mut self,
        register: u8,
        value: u16,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.write_u8(register, Port::A, value as u8).await?;
        self.write_u8(register, Port::B, (value >> 8) as u8).await
    }
}
