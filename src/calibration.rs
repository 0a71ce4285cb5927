use crate::bus::Transport;
use crate::registers::{self, Registers};

pub const BLOCK_A_LEN: usize = 10;
pub const BLOCK_B_LEN: usize = 10;
pub const BLOCK_C_LEN: usize = 6;
pub const BLOCK_D_LEN: usize = 8;
pub const CALIBRATION_LEN: usize = BLOCK_A_LEN + BLOCK_B_LEN + BLOCK_C_LEN + BLOCK_D_LEN;

const BLOCKS: [(u8, usize); 4] = [
    (registers::CALIB_A, BLOCK_A_LEN),
    (registers::CALIB_B, BLOCK_B_LEN),
    (registers::CALIB_C, BLOCK_C_LEN),
    (registers::CALIB_D, BLOCK_D_LEN),
];

/// Factory trimming coefficients, read once from NVM.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationData {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,

    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,

    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    pub dig_h4: i16,
    pub dig_h5: i16,
    pub dig_h6: i8,
}

fn unsigned_short(lsb: u8, msb: u8) -> u16 {
    (msb as u16) << 8 | lsb as u16
}

fn signed_short(lsb: u8, msb: u8) -> i16 {
    unsigned_short(lsb, msb) as i16
}

impl CalibrationData {
    /// Reads the four calibration blocks, one sequential read each.
    pub fn load<T: Transport>(regs: &mut Registers<T>) -> Result<CalibrationData, T::Error> {
        let mut bytes = [0u8; CALIBRATION_LEN];
        let mut offset = 0;
        for &(start, len) in &BLOCKS {
            regs.read_registers(start, &mut bytes[offset..offset + len])?;
            offset += len;
        }

        let calib = CalibrationData::from_bytes(&bytes);
        debug!("calibration {:?}", calib);
        Ok(calib)
    }

    /// Decodes the 34 bytes of blocks A to D laid end to end.
    pub fn from_bytes(bytes: &[u8; CALIBRATION_LEN]) -> CalibrationData {
        let mut calib = CalibrationData::default();
        let (a, rest) = bytes.split_at(BLOCK_A_LEN);
        let (b, rest) = rest.split_at(BLOCK_B_LEN);
        let (c, d) = rest.split_at(BLOCK_C_LEN);
        calib.set_block_a(a);
        calib.set_block_b(b);
        calib.set_block_c(c);
        calib.set_block_d(d);
        calib
    }

    // 0x88..=0x91
    fn set_block_a(&mut self, data: &[u8]) {
        self.dig_t1 = unsigned_short(data[0], data[1]);
        self.dig_t2 = signed_short(data[2], data[3]);
        self.dig_t3 = signed_short(data[4], data[5]);
        self.dig_p1 = unsigned_short(data[6], data[7]);
        self.dig_p2 = signed_short(data[8], data[9]);
    }

    // 0x92..=0x9B
    fn set_block_b(&mut self, data: &[u8]) {
        self.dig_p3 = signed_short(data[0], data[1]);
        self.dig_p4 = signed_short(data[2], data[3]);
        self.dig_p5 = signed_short(data[4], data[5]);
        self.dig_p6 = signed_short(data[6], data[7]);
        self.dig_p7 = signed_short(data[8], data[9]);
    }

    // 0x9C..=0xA1, 0xA0 is not used.
    fn set_block_c(&mut self, data: &[u8]) {
        self.dig_p8 = signed_short(data[0], data[1]);
        self.dig_p9 = signed_short(data[2], data[3]);
        self.dig_h1 = data[5];
    }

    // 0xE1..=0xE8. dig_H4 and dig_H5 are 12 bits wide and share 0xE5:
    // H4 takes its low nibble, H5 its high nibble. 0xE8 is not used.
    fn set_block_d(&mut self, data: &[u8]) {
        self.dig_h2 = signed_short(data[0], data[1]);
        self.dig_h3 = data[2];
        self.dig_h4 = ((data[3] as u16) << 4 | (data[4] & 0x0F) as u16) as i16;
        self.dig_h5 = ((data[5] as u16) << 4 | (data[4] >> 4) as u16) as i16;
        self.dig_h6 = data[6] as i8;
    }
}
