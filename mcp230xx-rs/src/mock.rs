//! In-memory MCP230xx stand-in for host tests.
//!
//! Models the register file in the bank 0 layout with an auto-incrementing
//! address pointer. Reading INTCAP clears the matching INTF byte, as the
//! chip does.

use core::convert::Infallible;

use embedded_hal_async::i2c::{ErrorType, I2c, Operation};

const INTF_A: usize = 0x0E;
const INTCAP_A: usize = 0x10;

pub(crate) struct MockBus {
    pub registers: [u8; 0x16],
    pub addresses: Vec<u8>,
    pub writes: Vec<(u8, u8)>,
    pointer: usize,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            registers: [0; 0x16],
            addresses: Vec::new(),
            writes: Vec::new(),
            pointer: 0,
        }
    }
}

impl ErrorType for MockBus {
    type Error = Infallible;
}

impl I2c for MockBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.addresses.push(address);

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&register, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = register as usize;
                    for &byte in data {
                        self.writes.push((self.pointer as u8, byte));
                        self.registers[self.pointer] = byte;
                        self.pointer += 1;
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer];
                        if self.pointer == INTCAP_A || self.pointer == INTCAP_A + 1 {
                            self.registers[INTF_A + (self.pointer - INTCAP_A)] = 0;
                        }
                        self.pointer += 1;
                    }
                }
            }
        }

        Ok(())
    }
}
