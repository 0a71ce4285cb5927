use crate::bus::Transport;

pub const ID: u8 = 0xD0;
pub const CALIB_A: u8 = 0x88;
pub const CALIB_B: u8 = 0x92;
pub const CALIB_C: u8 = 0x9C;
pub const CALIB_D: u8 = 0xE1;
pub const CTRL_HUM: u8 = 0xF2;
pub const STATUS: u8 = 0xF3;
pub const CTRL_MEAS: u8 = 0xF4;
pub const MEASURES: u8 = 0xF7;

pub const CHIP_ID: u8 = 0x60;

pub const OSRS_H_X1: u8 = 0x01;
pub const OSRS_T_X1: u8 = 0x20;
pub const OSRS_P_X1: u8 = 0x04;
pub const MODE_FORCED: u8 = 0x01;

pub const STATUS_MEASURING: u8 = 0x08;

/// Register-level view of one device on a transport.
///
/// Every call is one bus write, optionally followed by one bus read.
pub struct Registers<T> {
    transport: T,
    address: u16,
}

impl<T: Transport> Registers<T> {
    pub fn new(transport: T, address: u16) -> Registers<T> {
        Registers {
            transport: transport,
            address: address,
        }
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn read_reg(&mut self, reg: u8) -> Result<u8, T::Error> {
        let mut value = [0u8; 1];
        self.transport.write(self.address, &[reg])?;
        self.transport.read(self.address, &mut value)?;
        Ok(value[0])
    }

    /// Reads `buf.len()` bytes starting at `start`; the device auto-increments.
    pub fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<(), T::Error> {
        self.transport.write(self.address, &[start])?;
        self.transport.read(self.address, buf)
    }

    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), T::Error> {
        self.transport.write(self.address, &[reg, value])
    }
}
