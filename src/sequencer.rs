use crate::bus::Transport;
use crate::registers::{self, Registers};

/// Maximum number of status reads before a cycle is abandoned.
pub const POLL_LIMIT: u8 = 30;

pub const MEASURES_LEN: usize = 8;

/// Uncompensated ADC counts of one forced conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMeasurement {
    pub adc_pressure: i32,
    pub adc_temperature: i32,
    pub adc_humidity: i32,
}

impl RawMeasurement {
    /// Unpacks 0xF7..=0xFE: 20 bit pressure, 20 bit temperature, 16 bit humidity,
    /// all big endian. The low nibble of 0xF9 and 0xFC is not part of the sample.
    pub fn from_bytes(data: &[u8; MEASURES_LEN]) -> RawMeasurement {
        let twenty_bits = |msb: u8, lsb: u8, xlsb: u8| (msb as i32) << 12 | (lsb as i32) << 4 | (xlsb as i32) >> 4;
        RawMeasurement {
            adc_pressure: twenty_bits(data[0], data[1], data[2]),
            adc_temperature: twenty_bits(data[3], data[4], data[5]),
            adc_humidity: (data[6] as i32) << 8 | data[7] as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Triggered,
    /// `polls` status reads have reported a conversion in progress so far.
    Polling { polls: u8 },
    Complete { raw: RawMeasurement, polls: u8 },
    TimedOut,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        match *self {
            State::Complete { .. } | State::TimedOut => true,
            _ => false,
        }
    }
}

/// One forced measurement cycle. Create a fresh sequencer per cycle.
pub struct Sequencer {
    state: State,
}

impl Sequencer {
    pub fn new() -> Sequencer {
        Sequencer { state: State::Idle }
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Performs a single transition. On a transport error the state is left as it was.
    pub fn step<T: Transport>(&mut self, regs: &mut Registers<T>) -> Result<State, T::Error> {
        self.state = match self.state {
            State::Idle => {
                // ctrl_hum only latches on the following ctrl_meas write.
                regs.write_reg(registers::CTRL_HUM, registers::OSRS_H_X1)?;
                regs.write_reg(
                    registers::CTRL_MEAS,
                    registers::OSRS_T_X1 | registers::OSRS_P_X1 | registers::MODE_FORCED,
                )?;
                State::Triggered
            }
            State::Triggered => State::Polling { polls: 0 },
            State::Polling { polls } => {
                let status = regs.read_reg(registers::STATUS)?;
                let polls = polls + 1;
                if status & registers::STATUS_MEASURING == 0 {
                    let mut data = [0u8; MEASURES_LEN];
                    regs.read_registers(registers::MEASURES, &mut data)?;
                    State::Complete {
                        raw: RawMeasurement::from_bytes(&data),
                        polls: polls,
                    }
                } else if polls >= POLL_LIMIT {
                    State::TimedOut
                } else {
                    State::Polling { polls: polls }
                }
            }
            terminal => terminal,
        };
        Ok(self.state)
    }

    /// Steps until `Complete` or `TimedOut`.
    pub fn run<T: Transport>(&mut self, regs: &mut Registers<T>) -> Result<State, T::Error> {
        while !self.state.is_terminal() {
            self.step(regs)?;
        }
        Ok(self.state)
    }
}
