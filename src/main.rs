#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use docopt::Docopt;

#[cfg(target_os = "linux")]
use std::error::Error;
#[cfg(target_os = "linux")]
use std::{process, thread, time};

#[cfg(target_os = "linux")]
use bme280_forced::{LinuxTransport, MeasureStatus, BME280, Transport};

const USAGE: &'static str = "
Reading BME280 sensor value in forced mode

Usage:
  bme280 <device> [--address <addr>] [--temperature] [--pressure] [--humidity] [--raw] [--count <n>] [--interval <ms>]
  bme280 (-h | --help)
  bme280 (-v | --version)

Options:
  -h --help    Show this help text.
  --address <addr>     I2C device address [default: 118] (=0x76)
  --temperature    Show temperature.
  --pressure    Show pressure.
  --humidity    Show humidity.
  --raw    Show fixed-point values (0.01 DegC, Q24.8 Pa, Q22.10 %RH).
  --count <n>    Number of measurements [default: 1].
  --interval <ms>    Milliseconds between measurements [default: 1000].
  -v --version    Show version.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_device: String,
    flag_address: u16,
    flag_version: bool,
    flag_temperature: bool,
    flag_pressure: bool,
    flag_humidity: bool,
    flag_raw: bool,
    flag_count: u32,
    flag_interval: u64,
}

#[cfg(not(target_os = "linux"))]
fn main() {
    println!("This program can run only on Linux")
}

#[cfg(target_os = "linux")]
fn main() {
    env_logger::init();
    let args: Args = Docopt::new(USAGE).and_then(|d| d.deserialize()).unwrap_or_else(|e| e.exit());

    if args.flag_version {
        println!("bme280 {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(err) = run(&args) {
        eprintln!("bme280: {}", err);
        process::exit(1);
    }
}

#[cfg(target_os = "linux")]
fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let transport = LinuxTransport::open(&args.arg_device, args.flag_address)?;
    let mut bme280 = BME280::new(transport, args.flag_address)?;

    for i in 0..args.flag_count {
        if i > 0 {
            thread::sleep(time::Duration::from_millis(args.flag_interval));
        }
        match bme280.measure()? {
            MeasureStatus::Complete => print_readings(&bme280, args),
            MeasureStatus::TimedOut => warn!("measurement {} timed out", i + 1),
            MeasureStatus::Unavailable => {
                return Err(format!("no BME280 at 0x{:02X}", bme280.address()).into());
            }
        }
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn print_readings<T: Transport>(bme280: &BME280<T>, args: &Args) {
    // No selection shows everything.
    let all = !(args.flag_temperature || args.flag_pressure || args.flag_humidity);

    if args.flag_temperature || all {
        if args.flag_raw {
            println!("{}", bme280.temperature());
        } else {
            println!("{}", bme280.temperature_celsius());
        }
    }
    if args.flag_pressure || all {
        if !bme280.pressure_valid() {
            warn!("pressure compensation degenerate, reporting 0");
        }
        if args.flag_raw {
            println!("{}", bme280.pressure());
        } else {
            println!("{:.2}", bme280.pressure_pascal() / 100.0);
        }
    }
    if args.flag_humidity || all {
        if args.flag_raw {
            println!("{}", bme280.humidity());
        } else {
            println!("{:.2}", bme280.humidity_percent());
        }
    }
}
