//! Register access to the I/O expander port.
//!
//! The encoder only needs a handful of 16-bit registers. [`PortRegisters`]
//! names them; the `mcp230xx` feature provides the implementation for
//! [`mcp230xx::Mcp230xx`].

/// Writable configuration registers, as 16-bit pin masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigRegister {
    /// Direction, 1 = input.
    Mode,
    /// Weak pull-up enable.
    Pullup,
    /// Input inversion, 1 = pin LOW reads as logical 1.
    InputPolarity,
    /// Interrupt-on-change enable.
    InterruptEnable,
}

impl ConfigRegister {
    /// Registers whose encoder bits are set when the encoder is armed.
    pub const ARMING: [ConfigRegister; 4] = [
        ConfigRegister::Mode,
        ConfigRegister::Pullup,
        ConfigRegister::InputPolarity,
        ConfigRegister::InterruptEnable,
    ];
}

/// 16-bit register access to an I/O expander port.
///
/// Bit `n` of every mask is pin `n` of the port.
#[allow(async_fn_in_trait)]
pub trait PortRegisters {
    /// Transport error.
    type Error;

    /// Read a configuration register.
    async fn read(&mut self, register: ConfigRegister) -> Result<u16, Self::Error>;

    /// Overwrite a configuration register.
    async fn write(&mut self, register: ConfigRegister, mask: u16) -> Result<(), Self::Error>;

    /// Pins that caused the pending interrupt.
    async fn interrupt_flag(&mut self) -> Result<u16, Self::Error>;

    /// Port levels latched when the interrupt fired. Reading clears the latch.
    async fn interrupt_captured(&mut self) -> Result<u16, Self::Error>;

    /// OR `bits` into `register`, leaving other pins untouched.
    async fn set_bits(&mut self, register: ConfigRegister, bits: u16) -> Result<(), Self::Error> {
        let current = self.read(register).await?;
        self.write(register, current | bits).await
    }
}

impl<P> PortRegisters for &mut P
where
    P: PortRegisters + ?Sized,
{
    type Error = P::Error;

    async fn read(&mut self, register: ConfigRegister) -> Result<u16, Self::Error> {
        P::read(self, register).await
    }

    async fn write(&mut self, register: ConfigRegister, mask: u16) -> Result<(), Self::Error> {
        P::write(self, register, mask).await
    }

    async fn interrupt_flag(&mut self) -> Result<u16, Self::Error> {
        P::interrupt_flag(self).await
    }

    async fn interrupt_captured(&mut self) -> Result<u16, Self::Error> {
        P::interrupt_captured(self).await
    }
}

#[cfg(feature = "mcp230xx")]
mod mcp {
    use embedded_hal_async::i2c::I2c;
    use mcp230xx::{ExpanderError, Mcp230xx};

    use super::{ConfigRegister, PortRegisters};

    impl<I2C> PortRegisters for Mcp230xx<I2C>
    where
        I2C: I2c,
    {
        type Error = ExpanderError<I2C::Error>;

        async fn read(&mut self, register: ConfigRegister) -> Result<u16, Self::Error> {
            match register {
                ConfigRegister::Mode => self.mode().await,
                ConfigRegister::Pullup => self.pullup().await,
                ConfigRegister::InputPolarity => self.input_polarity().await,
                ConfigRegister::InterruptEnable => self.interrupt_enable().await,
            }
        }

        async fn write(&mut self, register: ConfigRegister, mask: u16) -> Result<(), Self::Error> {
            match register {
                ConfigRegister::Mode => self.set_mode(mask).await,
                ConfigRegister::Pullup => self.set_pullup(mask).await,
                ConfigRegister::InputPolarity => self.set_input_polarity(mask).await,
                ConfigRegister::InterruptEnable => self.set_interrupt_enable(mask).await,
            }
        }

        async fn interrupt_flag(&mut self) -> Result<u16, Self::Error> {
            Mcp230xx::interrupt_flag(self).await
        }

        async fn interrupt_captured(&mut self) -> Result<u16, Self::Error> {
            Mcp230xx::interrupt_captured(self).await
        }
    }

}
