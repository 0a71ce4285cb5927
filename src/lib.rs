//! # bme280-forced
//!
//! Forced-mode driver for the BME280 temperature, pressure and humidity
//! sensor. Compensation is integer only; readings are kept in the vendor
//! fixed-point formats (0.01 DegC, Q24.8 Pa, Q22.10 %RH).
//!
//! # Examples
//! ```no_run
//! use bme280_forced::{LinuxTransport, MeasureStatus, BME280, DEFAULT_ADDRESS};
//!
//! let transport = LinuxTransport::open("/dev/i2c-1", DEFAULT_ADDRESS).unwrap();
//! let mut bme280 = BME280::new(transport, DEFAULT_ADDRESS).unwrap();
//! if bme280.measure().unwrap() == MeasureStatus::Complete {
//!     println!("{}", bme280.temperature_celsius());
//!     println!("{:.2}", bme280.humidity_percent());
//!     println!("{:.2}", bme280.pressure_pascal() / 100.0);
//! }
//! ```

#[macro_use]
extern crate log;

mod bme280;
mod bus;
mod calibration;
mod compensation;
mod error;
mod registers;
mod sequencer;

pub use crate::bme280::*;
pub use crate::bus::Transport;
#[cfg(target_os = "linux")]
pub use crate::bus::LinuxTransport;
pub use crate::error::Error;
