#[cfg(target_os = "linux")]
use std::path::Path;

#[cfg(target_os = "linux")]
use i2cdev::core::I2CDevice;
#[cfg(target_os = "linux")]
use i2cdev::linux::*;

/// Blocking two-wire transport the driver talks through.
///
/// `address` is the device address on the bus. Implementations must perform
/// exactly one bus transaction per call and must not retry.
pub trait Transport {
    type Error;

    fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), Self::Error>;

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<'a, T: Transport + ?Sized> Transport for &'a mut T {
    type Error = T::Error;

    fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, bytes)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(address, buf)
    }
}

/// `Transport` over a Linux `/dev/i2c-*` character device.
#[cfg(target_os = "linux")]
pub struct LinuxTransport {
    device: LinuxI2CDevice,
    slave_address: u16,
}

#[cfg(target_os = "linux")]
impl LinuxTransport {
    pub fn open<P: AsRef<Path>>(path: P, slave_address: u16) -> Result<LinuxTransport, LinuxI2CError> {
        let device = LinuxI2CDevice::new(path, slave_address)?;
        Ok(LinuxTransport {
            device: device,
            slave_address: slave_address,
        })
    }

    // The kernel binds one slave address per file descriptor.
    fn select(&mut self, address: u16) -> Result<(), LinuxI2CError> {
        if address != self.slave_address {
            self.device.set_slave_address(address)?;
            self.slave_address = address;
        }
        Ok(())
    }
}

#[cfg(target_os = "linux")]
impl Transport for LinuxTransport {
    type Error = LinuxI2CError;

    fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), LinuxI2CError> {
        self.select(address)?;
        self.device.write(bytes)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), LinuxI2CError> {
        self.select(address)?;
        self.device.read(buf)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::Transport;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Write(u16, Vec<u8>),
        Read(u16, usize),
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct FakeError;

    /// Scripted transport: records every call, answers reads from a queue.
    pub struct FakeBus {
        pub ops: Vec<Op>,
        responses: VecDeque<Vec<u8>>,
        fail_after: Option<usize>,
    }

    impl FakeBus {
        pub fn new() -> FakeBus {
            FakeBus {
                ops: Vec::new(),
                responses: VecDeque::new(),
                fail_after: None,
            }
        }

        pub fn respond(&mut self, bytes: &[u8]) -> &mut FakeBus {
            self.responses.push_back(bytes.to_vec());
            self
        }

        /// Every call after the first `n` ones fails.
        pub fn fail_after(&mut self, n: usize) -> &mut FakeBus {
            self.fail_after = Some(n);
            self
        }

        pub fn writes(&self) -> Vec<(u16, Vec<u8>)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Write(addr, bytes) => Some((*addr, bytes.clone())),
                    _ => None,
                })
                .collect()
        }

        fn check(&self) -> Result<(), FakeError> {
            match self.fail_after {
                Some(n) if self.ops.len() > n => Err(FakeError),
                _ => Ok(()),
            }
        }
    }

    impl Transport for FakeBus {
        type Error = FakeError;

        fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), FakeError> {
            self.ops.push(Op::Write(address, bytes.to_vec()));
            self.check()
        }

        fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), FakeError> {
            self.ops.push(Op::Read(address, buf.len()));
            self.check()?;
            let data = self
                .responses
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted response for read of {} bytes", buf.len()));
            assert_eq!(data.len(), buf.len(), "scripted response length mismatch");
            buf.copy_from_slice(&data);
            Ok(())
        }
    }
}
