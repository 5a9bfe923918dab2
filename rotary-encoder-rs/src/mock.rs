//! Test doubles for the expander port, the INT line and the change sink.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{Error, ErrorKind, ErrorType};
use embedded_hal_async::digital::Wait;

use crate::notify::OnChange;
use crate::port::{ConfigRegister, PortRegisters};

// ── Change sink ──────────────────────────────────────────────────────────

/// Records every notification.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub calls: Vec<(i32, bool)>,
}

impl OnChange for Recorder {
    fn on_change(&mut self, value: i32, button_state: bool) {
        self.calls.push((value, button_state));
    }
}

// ── Port ─────────────────────────────────────────────────────────────────

/// Register-level stand-in for an expander port.
///
/// `registers` is indexed in [`ConfigRegister::ARMING`] order. Reading the
/// captured register clears the pending flags, as the hardware does, which
/// also releases the INT line handed out by [`MockPort::line`].
#[derive(Debug, Default)]
pub(crate) struct MockPort {
    pub registers: [u16; 4],
    pub captured: u16,
    pub captured_reads: usize,
    pub fail: bool,
    pub(crate) flagged: Rc<Cell<u16>>,
}

impl MockPort {
    /// Latch an interrupt. INT stays low until INTCAP is read.
    pub fn pending(&mut self, flagged: u16, captured: u16) {
        self.flagged.set(flagged);
        self.captured = captured;
    }

    pub fn flagged(&self) -> u16 {
        self.flagged.get()
    }

    /// INT output of this port: low while any flag is pending.
    pub fn line(&self) -> MockLine {
        MockLine {
            flagged: Rc::clone(&self.flagged),
            ..MockLine::default()
        }
    }

    fn index(register: ConfigRegister) -> usize {
        match register {
            ConfigRegister::Mode => 0,
            ConfigRegister::Pullup => 1,
            ConfigRegister::InputPolarity => 2,
            ConfigRegister::InterruptEnable => 3,
        }
    }

    fn check(&self) -> Result<(), ()> {
        if self.fail {
            Err(())
        } else {
            Ok(())
        }
    }
}

impl PortRegisters for MockPort {
    type Error = ();

    async fn read(&mut self, register: ConfigRegister) -> Result<u16, Self::Error> {
        self.check()?;
        Ok(self.registers[Self::index(register)])
    }

    async fn write(&mut self, register: ConfigRegister, mask: u16) -> Result<(), Self::Error> {
        self.check()?;
        self.registers[Self::index(register)] = mask;
        Ok(())
    }

    async fn interrupt_flag(&mut self) -> Result<u16, Self::Error> {
        self.check()?;
        Ok(self.flagged.get())
    }

    async fn interrupt_captured(&mut self) -> Result<u16, Self::Error> {
        self.check()?;
        self.captured_reads += 1;
        self.flagged.set(0);
        Ok(self.captured)
    }
}

// ── INT line ─────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MockLineError;

impl Error for MockLineError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Open-drain INT line driven by a [`MockPort`].
///
/// The level is derived from the port's pending flags and nothing ever
/// toggles it between polls, so edge waits never complete. A line built
/// with `default()` is not wired to any port and idles high.
#[derive(Debug, Default)]
pub(crate) struct MockLine {
    /// Completed level waits.
    pub waits: usize,
    pub fail: bool,
    flagged: Rc<Cell<u16>>,
}

impl MockLine {
    fn is_low(&self) -> bool {
        self.flagged.get() != 0
    }

    async fn level(&mut self, low: bool) -> Result<(), MockLineError> {
        if self.fail {
            return Err(MockLineError);
        }
        if self.is_low() != low {
            core::future::pending::<()>().await;
        }
        self.waits += 1;
        Ok(())
    }

    async fn edge(&mut self) -> Result<(), MockLineError> {
        if self.fail {
            return Err(MockLineError);
        }
        core::future::pending().await
    }
}

impl ErrorType for MockLine {
    type Error = MockLineError;
}

impl Wait for MockLine {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.level(false).await
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.level(true).await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.edge().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.edge().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.edge().await
    }
}

// ── I2C bus ──────────────────────────────────────────────────────────────

/// MCP230xx register file in the bank 0 layout.
#[cfg(feature = "mcp230xx")]
pub(crate) struct MockBus {
    pub registers: [u8; 0x16],
    pointer: usize,
}

#[cfg(feature = "mcp230xx")]
impl MockBus {
    pub fn new() -> Self {
        Self {
            registers: [0; 0x16],
            pointer: 0,
        }
    }
}

#[cfg(feature = "mcp230xx")]
impl embedded_hal_async::i2c::ErrorType for MockBus {
    type Error = core::convert::Infallible;
}

#[cfg(feature = "mcp230xx")]
impl embedded_hal_async::i2c::I2c for MockBus {
    async fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [embedded_hal_async::i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        use embedded_hal_async::i2c::Operation;

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&register, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = register as usize;
                    for &byte in data {
                        self.registers[self.pointer] = byte;
                        self.pointer += 1;
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer];
                        self.pointer += 1;
                    }
                }
            }
        }

        Ok(())
    }
}
