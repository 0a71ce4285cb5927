use crate::bus::Transport;
use crate::calibration::CalibrationData;
use crate::compensation;
use crate::error::Error;
use crate::registers::{self, Registers};
use crate::sequencer::{RawMeasurement, Sequencer, State};

/// 7-bit address with SDO tied to GND.
pub const DEFAULT_ADDRESS: u16 = 0x76;

/// Outcome of a `measure` call that did not fail on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureStatus {
    /// New readings are available.
    Complete,
    /// The conversion did not finish within the poll budget; readings are unchanged.
    TimedOut,
    /// The device failed the identity check at construction; nothing was done.
    Unavailable,
}

pub struct BME280<T> {
    regs: Registers<T>,
    calibration: CalibrationData,
    available: bool,
    temperature: i32,
    pressure: i32,
    pressure_valid: bool,
    humidity: i32,
}

impl<T: Transport> BME280<T> {
    /// Probes the device and reads its calibration.
    ///
    /// An identity mismatch is not an error: the handle is returned with
    /// `is_available() == false` and every measurement becomes a no-op.
    pub fn new(transport: T, address: u16) -> Result<BME280<T>, Error<T::Error>> {
        let mut regs = Registers::new(transport, address);
        let available = check_id(&mut regs).map_err(Error::Bus)?;
        let calibration = if available {
            CalibrationData::load(&mut regs).map_err(Error::Bus)?
        } else {
            CalibrationData::default()
        };

        Ok(BME280 {
            regs: regs,
            calibration: calibration,
            available: available,
            temperature: 0,
            pressure: 0,
            pressure_valid: false,
            humidity: 0,
        })
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn address(&self) -> u16 {
        self.regs.address()
    }

    /// Runs one forced conversion and compensates the result.
    pub fn measure(&mut self) -> Result<MeasureStatus, Error<T::Error>> {
        if !self.available {
            return Ok(MeasureStatus::Unavailable);
        }

        match Sequencer::new().run(&mut self.regs).map_err(Error::Bus)? {
            State::Complete { raw, polls } => {
                debug!("done measuring in {} polls", polls);
                self.compensate(&raw);
                Ok(MeasureStatus::Complete)
            }
            _ => {
                warn!("measure wait overflow at 0x{:02X}", self.regs.address());
                Ok(MeasureStatus::TimedOut)
            }
        }
    }

    // Temperature first: the other two consume its fine temperature.
    fn compensate(&mut self, raw: &RawMeasurement) {
        let (temperature, t_fine) = compensation::compensate_temperature(raw.adc_temperature, &self.calibration);
        let pressure = compensation::compensate_pressure(raw.adc_pressure, &self.calibration, t_fine);
        let humidity = compensation::compensate_humidity(raw.adc_humidity, &self.calibration, t_fine);
        self.temperature = temperature;
        self.pressure = pressure.unwrap_or(0);
        self.pressure_valid = pressure.is_some();
        self.humidity = humidity;
        debug!(
            "temperature {} pressure {} humidity {}",
            self.temperature, self.pressure, self.humidity
        );
    }

    /// Last temperature in 0.01 DegC.
    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    /// Last pressure in Pa, Q24.8. `0` if the calibration made the formula divide by zero.
    pub fn pressure(&self) -> i32 {
        self.pressure
    }

    /// Last relative humidity in %RH, Q22.10.
    pub fn humidity(&self) -> i32 {
        self.humidity
    }

    /// False when the last pressure is the zero placeholder for a degenerate calibration.
    pub fn pressure_valid(&self) -> bool {
        self.pressure_valid
    }

    pub fn temperature_celsius(&self) -> f32 {
        self.temperature as f32 / 100.0
    }

    pub fn pressure_pascal(&self) -> f32 {
        self.pressure as f32 / 256.0
    }

    pub fn humidity_percent(&self) -> f32 {
        self.humidity as f32 / 1024.0
    }

    /// Gives the transport back.
    pub fn release(self) -> T {
        self.regs.into_inner()
    }
}

fn check_id<T: Transport>(regs: &mut Registers<T>) -> Result<bool, T::Error> {
    let id = regs.read_reg(registers::ID)?;
    if id == registers::CHIP_ID {
        info!("BME280 id 0x{:02X} at 0x{:02X}", id, regs.address());
        Ok(true)
    } else {
        warn!("no BME280 at 0x{:02X}, id 0x{:02X}", regs.address(), id);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::testing::{FakeBus, FakeError, Op};
    use crate::calibration::tests::{BLOCK_A, BLOCK_B, BLOCK_C, BLOCK_D};
    use crate::sequencer::POLL_LIMIT;

    const MEASURES: [u8; 8] = [0x5A, 0x32, 0x00, 0x80, 0x3B, 0x80, 0x7F, 0x5A];

    fn probed_bus() -> FakeBus {
        let mut bus = FakeBus::new();
        bus.respond(&[0x60])
            .respond(&BLOCK_A)
            .respond(&BLOCK_B)
            .respond(&BLOCK_C)
            .respond(&BLOCK_D);
        bus
    }

    #[test]
    fn end_to_end_measurement() {
        let mut bus = probed_bus();
        bus.respond(&[0x08]).respond(&[0x00]).respond(&MEASURES);
        let mut bme280 = BME280::new(&mut bus, DEFAULT_ADDRESS).unwrap();

        assert!(bme280.is_available());
        assert_eq!(bme280.measure(), Ok(MeasureStatus::Complete));
        assert_eq!(bme280.temperature(), 2426);
        assert_eq!(bme280.pressure(), 33_570_825);
        assert_eq!(bme280.humidity(), 63_988);
        assert!(bme280.pressure_valid());
        assert_eq!(bme280.temperature_celsius(), 24.26);
        assert_eq!(bme280.humidity_percent(), 63_988.0 / 1024.0);

        let writes = bus.writes();
        assert_eq!(writes[0], (0x76, vec![0xD0]));
        assert!(writes.contains(&(0x76, vec![0xF2, 0x01])));
        assert!(writes.contains(&(0x76, vec![0xF4, 0x25])));
    }

    #[test]
    fn repeated_measurements_are_reproducible() {
        let mut bus = probed_bus();
        for _ in 0..2 {
            bus.respond(&[0x00]).respond(&MEASURES);
        }
        let mut bme280 = BME280::new(&mut bus, DEFAULT_ADDRESS).unwrap();

        bme280.measure().unwrap();
        let first = (bme280.temperature(), bme280.pressure(), bme280.humidity());
        bme280.measure().unwrap();
        assert_eq!((bme280.temperature(), bme280.pressure(), bme280.humidity()), first);
    }

    #[test]
    fn identity_mismatch_disables_driver() {
        let mut bus = FakeBus::new();
        bus.respond(&[0x58]);
        let mut bmp280 = BME280::new(&mut bus, 0x77).unwrap();

        assert!(!bmp280.is_available());
        assert_eq!(bmp280.measure(), Ok(MeasureStatus::Unavailable));
        assert_eq!(bus.ops, vec![Op::Write(0x77, vec![0xD0]), Op::Read(0x77, 1)]);
    }

    #[test]
    fn timeout_keeps_previous_readings() {
        let mut bus = probed_bus();
        bus.respond(&[0x00]).respond(&MEASURES);
        for _ in 0..POLL_LIMIT {
            bus.respond(&[0x08]);
        }
        let mut bme280 = BME280::new(&mut bus, DEFAULT_ADDRESS).unwrap();

        assert_eq!(bme280.measure(), Ok(MeasureStatus::Complete));
        assert_eq!(bme280.measure(), Ok(MeasureStatus::TimedOut));
        assert_eq!(bme280.temperature(), 2426);
        assert_eq!(bme280.pressure(), 33_570_825);
        assert_eq!(bme280.humidity(), 63_988);
    }

    #[test]
    fn degenerate_pressure_calibration_is_flagged() {
        let mut bus = FakeBus::new();
        let mut block_a = BLOCK_A;
        // dig_P1 = 0
        block_a[6] = 0;
        block_a[7] = 0;
        bus.respond(&[0x60])
            .respond(&block_a)
            .respond(&BLOCK_B)
            .respond(&BLOCK_C)
            .respond(&BLOCK_D)
            .respond(&[0x00])
            .respond(&MEASURES);
        let mut bme280 = BME280::new(&mut bus, DEFAULT_ADDRESS).unwrap();

        assert_eq!(bme280.measure(), Ok(MeasureStatus::Complete));
        assert_eq!(bme280.pressure(), 0);
        assert!(!bme280.pressure_valid());
        assert_eq!(bme280.temperature(), 2426);
    }

    #[test]
    fn transport_failure_during_probe_propagates() {
        let mut bus = FakeBus::new();
        bus.respond(&[0x60]).fail_after(2);

        assert_eq!(BME280::new(&mut bus, DEFAULT_ADDRESS).err(), Some(Error::Bus(FakeError)));
    }

    #[test]
    fn transport_failure_during_measure_propagates() {
        let mut bus = probed_bus();
        // id + four blocks, then ctrl_hum goes through and ctrl_meas fails
        bus.fail_after(11);
        let mut bme280 = BME280::new(&mut bus, DEFAULT_ADDRESS).unwrap();

        assert_eq!(bme280.measure(), Err(Error::Bus(FakeError)));
        assert_eq!(bme280.temperature(), 0);
    }

    #[test]
    fn release_returns_transport() {
        let mut bus = probed_bus();
        let bme280 = BME280::new(&mut bus, DEFAULT_ADDRESS).unwrap();
        assert_eq!(bme280.address(), 0x76);
        let bus = bme280.release();
        assert_eq!(bus.ops.len(), 10);
    }
}
