//! High-level interface for the MCP23017 / MCP23018 I/O expanders.
//!
//! [`Mcp230xx`] wraps the low-level register driver with pin validation,
//! 16-bit port-pair accessors, per-pin configuration and IOCON handling.

use embedded_hal_async::i2c::I2c;

use crate::driver::RegisterDriver;
use crate::error::ExpanderError;
use crate::registers::*;

/// One of the two 8-bit ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// GPA0-GPA7, bits 0-7 of the 16-bit masks.
    A = 0,
    /// GPB0-GPB7, bits 8-15 of the 16-bit masks.
    B = 1,
}

/// Chip variant. The two parts differ in a couple of IOCON bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Push-pull outputs, SDA slew rate control.
    Mcp23017,
    /// Open-drain outputs, selectable interrupt clearing.
    Mcp23018,
}

/// Per-pin settings for [`Mcp230xx::configure_pin`].
///
/// Every field is optional; `None` leaves the corresponding register bit
/// untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// `true` = input, `false` = output.
    pub input: Option<bool>,
    /// Output level written to GPIO.
    pub level: Option<bool>,
    /// Weak 100k pull-up.
    pub pullup: Option<bool>,
    /// Invert the logic level seen in GPIO/INTCAP.
    pub inverted: Option<bool>,
    /// Interrupt-on-change.
    pub interrupt_enable: Option<bool>,
    /// `true` = compare against DEFVAL, `false` = against previous value.
    pub interrupt_compare_default: Option<bool>,
    /// DEFVAL bit used when comparing against the default value.
    pub default_value: Option<bool>,
}

impl PinConfig {
    /// Input with pull-up and inverted polarity, interrupt-on-change enabled.
    ///
    /// The usual setup for a mechanical contact switching to ground.
    pub fn active_low_input() -> Self {
        Self {
            input: Some(true),
            pullup: Some(true),
            inverted: Some(true),
            interrupt_enable: Some(true),
            ..Self::default()
        }
    }

    /// Output driven to `level`.
    pub fn output(level: bool) -> Self {
        Self {
            input: Some(false),
            level: Some(level),
            ..Self::default()
        }
    }
}

/// IOCON settings for [`Mcp230xx::configure`].
///
/// `None` leaves the bit unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoConfig {
    /// INT pins active-high. Setting this clears open-drain.
    pub interrupt_active_high: Option<bool>,
    /// INT pins as open drain (INTPOL ignored).
    pub interrupt_open_drain: Option<bool>,
    /// Disable SDA slew rate control. MCP23017 only.
    pub sda_slew_disabled: Option<bool>,
    /// Disable address pointer auto-increment.
    pub sequential_disabled: Option<bool>,
    /// Internally connect INTA and INTB.
    pub interrupt_mirror: Option<bool>,
    /// Bank layout: all port A registers first, then port B.
    pub bank: Option<bool>,
    /// Reading INTCAP (instead of GPIO) clears the interrupt. MCP23018 only.
    pub interrupt_clear_on_intcap: Option<bool>,
}

fn flip(value: u8, mask: u8, set: bool) -> u8 {
    if set {
        value | mask
    } else {
        value & !mask
    }
}

/// High-level interface for an MCP230xx 16-bit I/O expander.
///
/// All 16-bit masks carry port A in the low byte and port B in the high
/// byte, so bit `n` corresponds to pin `n` (GPA0 = 0, GPB7 = 15).
///
/// # Example
///
/// ```ignore
/// use mcp230xx::{Mcp230xx, PinConfig, DEFAULT_ADDRESS};
///
/// // `i2c` is any `embedded-hal-async` I2C implementation
/// let mut expander = Mcp230xx::new(i2c, DEFAULT_ADDRESS);
/// expander.init().await?;
///
/// expander.configure_pin(0, PinConfig::active_low_input()).await?;
/// let pressed = expander.read_pin(0).await?;
/// ```
pub struct Mcp230xx<I2C> {
    driver: RegisterDriver<I2C>,
    variant: Variant,
}

impl<I2C> Mcp230xx<I2C>
where
    I2C: I2c,
{
    /// Create an MCP23017 interface.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (0x20-0x27)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_variant(i2c, address, Variant::Mcp23017)
    }

    /// Create an interface for a specific chip variant.
    pub fn with_variant(i2c: I2C, address: u8, variant: Variant) -> Self {
        Self {
            driver: RegisterDriver::new(i2c, address),
            variant,
        }
    }

    /// The chip variant this interface was created for.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Release the I2C peripheral.
    pub fn release(self) -> I2C {
        self.driver.release()
    }

    /// Reset the expander to a known state.
    ///
    /// Writes IOCON = 0 (bank 0, sequential, push-pull active-low INT),
    /// then configures all pins as inputs without pull-ups, inversion or
    /// interrupts, and clears DEFVAL, INTCON and GPIO.
    ///
    /// # Errors
    /// * [`ExpanderError::I2c`] on communication failure — usually the
    ///   device is not present at the configured address
    pub async fn init(&mut self) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u8(IOCON, Port::A, 0x00).await?;

        self.set_mode(0xFFFF).await?;
        self.set_input_polarity(0x0000).await?;
        self.set_interrupt_enable(0x0000).await?;
        self.set_default_value(0x0000).await?;
        self.set_interrupt_compare_default(0x0000).await?;
        self.set_pullup(0x0000).await?;
        self.set_gpio(0x0000).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("MCP230xx reset to defaults");

        Ok(())
    }

    // -----------------------------------------------------------------------
    // 16-bit register accessors
    // -----------------------------------------------------------------------

    /// IODIR for both ports (1 = input).
    pub async fn mode(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(IODIR).await
    }

    /// Write IODIR for both ports.
    pub async fn set_mode(&mut self, mask: u16) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(IODIR, mask).await
    }

    /// IPOL for both ports (1 = inverted).
    pub async fn input_polarity(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(IPOL).await
    }

    /// Write IPOL for both ports.
    pub async fn set_input_polarity(&mut self, mask: u16) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(IPOL, mask).await
    }

    /// GPINTEN for both ports.
    pub async fn interrupt_enable(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(GPINTEN).await
    }

    /// Write GPINTEN for both ports.
    pub async fn set_interrupt_enable(&mut self, mask: u16) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(GPINTEN, mask).await
    }

    /// DEFVAL for both ports.
    pub async fn default_value(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(DEFVAL).await
    }

    /// Write DEFVAL for both ports.
    pub async fn set_default_value(&mut self, mask: u16) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(DEFVAL, mask).await
    }

    /// INTCON for both ports (1 = compare against DEFVAL).
    pub async fn interrupt_compare_default(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(INTCON).await
    }

    /// Write INTCON for both ports.
    pub async fn set_interrupt_compare_default(
        &mut self,
        mask: u16,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(INTCON, mask).await
    }

    /// GPPU for both ports.
    pub async fn pullup(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(GPPU).await
    }

    /// Write GPPU for both ports.
    pub async fn set_pullup(&mut self, mask: u16) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(GPPU, mask).await
    }

    /// INTF for both ports: which enabled pins caused the pending interrupt.
    pub async fn interrupt_flag(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(INTF).await
    }

    /// INTCAP for both ports: port levels latched when the interrupt fired.
    ///
    /// Reading clears the pending interrupt.
    pub async fn interrupt_captured(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(INTCAP).await
    }

    /// GPIO for both ports.
    pub async fn gpio(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(GPIO).await
    }

    /// Write GPIO for both ports. Only affects pins configured as outputs.
    pub async fn set_gpio(&mut self, mask: u16) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(GPIO, mask).await
    }

    /// OLAT for both ports.
    pub async fn output_latch(&mut self) -> Result<u16, ExpanderError<I2C::Error>> {
        self.driver.read_u16(OLAT).await
    }

    /// Write OLAT for both ports.
    pub async fn set_output_latch(&mut self, mask: u16) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u16(OLAT, mask).await
    }

    /// IOCON. The register is shared, so port A's copy is read.
    pub async fn io_config(&mut self) -> Result<u8, ExpanderError<I2C::Error>> {
        self.driver.read_u8(IOCON, Port::A).await
    }

    /// Write IOCON. Changes the bank layout used for subsequent accesses.
    pub async fn set_io_config(&mut self, value: u8) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u8(IOCON, Port::A, value).await
    }

    // -----------------------------------------------------------------------
    // Per-port accessors
    // -----------------------------------------------------------------------

    /// Read a single port's copy of `register`.
    pub async fn read_port(
        &mut self,
        register: u8,
        port: Port,
    ) -> Result<u8, ExpanderError<I2C::Error>> {
        self.driver.read_u8(register, port).await
    }

    /// Write a single port's copy of `register`.
    pub async fn write_port(
        &mut self,
        register: u8,
        port: Port,
        value: u8,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        self.driver.write_u8(register, port, value).await
    }

    /// Which pins of `port` triggered the pending interrupt.
    pub async fn interrupt_triggered(&mut self, port: Port) -> Result<u8, ExpanderError<I2C::Error>> {
        self.driver.read_u8(INTF, port).await
    }

    /// Levels of `port` captured at interrupt time. Clears that port's interrupt.
    pub async fn interrupt_captured_port(
        &mut self,
        port: Port,
    ) -> Result<u8, ExpanderError<I2C::Error>> {
        self.driver.read_u8(INTCAP, port).await
    }

    // -----------------------------------------------------------------------
    // Pin operations
    // -----------------------------------------------------------------------

    /// Apply `config` to a single pin with read-modify-write cycles.
    ///
    /// Only the registers named by `Some` fields are touched.
    ///
    /// # Errors
    /// * [`ExpanderError::InvalidPin`] if `pin >= 16`
    /// * [`ExpanderError::I2c`] on communication failure
    pub async fn configure_pin(
        &mut self,
        pin: u8,
        config: PinConfig,
    ) -> Result<(), ExpanderError<I2C::Error>> {
        let (port, bit) = Self::locate(pin)?;

        let updates = [
            (IODIR, config.input),
            (GPIO, config.level),
            (GPPU, config.pullup),
            (IPOL, config.inverted),
            (GPINTEN, config.interrupt_enable),
            (INTCON, config.interrupt_compare_default),
            (DEFVAL, config.default_value),
        ];

        for (register, setting) in updates {
            if let Some(set) = setting {
                let current = self.driver.read_u8(register, port).await?;
                self.driver
                    .write_u8(register, port, flip(current, bit, set))
                    .await?;
            }
        }

        Ok(())
    }

    /// Read the GPIO level of a single pin.
    pub async fn read_pin(&mut self, pin: u8) -> Result<bool, ExpanderError<I2C::Error>> {
        let (port, bit) = Self::locate(pin)?;
        Ok(self.driver.read_u8(GPIO, port).await? & bit != 0)
    }

    /// Drive a single output pin.
    pub async fn write_pin(&mut self, pin: u8, level: bool) -> Result<(), ExpanderError<I2C::Error>> {
        self.configure_pin(
            pin,
            PinConfig {
                level: Some(level),
                ..PinConfig::default()
            },
        )
        .await
    }

    /// Invert an output pin. Input pins are left alone.
    pub async fn toggle_pin(&mut self, pin: u8) -> Result<(), ExpanderError<I2C::Error>> {
        let (port, bit) = Self::locate(pin)?;

        if self.driver.read_u8(IODIR, port).await? & bit != 0 {
            return Ok(());
        }

        let current = self.driver.read_u8(GPIO, port).await?;
        self.driver.write_u8(GPIO, port, current ^ bit).await
    }

    // -----------------------------------------------------------------------
    // Device configuration
    // -----------------------------------------------------------------------

    /// Apply IOCON options.
    ///
    /// # Errors
    /// * [`ExpanderError::Unsupported`] when an option is set that this
    ///   chip variant does not have; IOCON is left untouched
    /// * [`ExpanderError::I2c`] on communication failure
    pub async fn configure(&mut self, config: IoConfig) -> Result<(), ExpanderError<I2C::Error>> {
        match self.variant {
            Variant::Mcp23017 if config.interrupt_clear_on_intcap.is_some() => {
                return Err(ExpanderError::Unsupported)
            }
            Variant::Mcp23018 if config.sda_slew_disabled.is_some() => {
                return Err(ExpanderError::Unsupported)
            }
            _ => {}
        }

        let mut value = self.io_config().await?;
        let mut open_drain = config.interrupt_open_drain;

        if let Some(set) = config.interrupt_clear_on_intcap {
            value = flip(value, IOCON_INTCC, set);
        }
        if let Some(set) = config.interrupt_active_high {
            value = flip(value, IOCON_INTPOL, set);
            // Active-high only takes effect with a push-pull INT output.
            if set {
                open_drain = Some(false);
            }
        }
        if let Some(set) = open_drain {
            value = flip(value, IOCON_ODR, set);
        }
        if let Some(set) = config.sda_slew_disabled {
            value = flip(value, IOCON_DISSLW, set);
        }
        if let Some(set) = config.sequential_disabled {
            value = flip(value, IOCON_SEQOP, set);
        }
        if let Some(set) = config.interrupt_mirror {
            value = flip(value, IOCON_MIRROR, set);
        }
        if let Some(set) = config.bank {
            value = flip(value, IOCON_BANK, set);
        }

        self.set_io_config(value).await
    }

    fn locate(pin: u8) -> Result<(Port, u8), ExpanderError<I2C::Error>> {
        if pin >= PIN_COUNT {
            return Err(ExpanderError::InvalidPin);
        }
        let port = if pin < 8 { Port::A } else { Port::B };
        Ok((port, 1 << (pin % 8)))
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
