//! Driver for the Infineon DPS310 barometric pressure / temperature sensor.
//!
//! The sensor is run in command mode: every call to
//! [`Dps310::measure_temperature`] or [`Dps310::measure_pressure`] triggers a
//! single conversion and reads back its 24-bit result, which is then
//! compensated with the factory coefficients read once at construction.
//!
//! ```no_run
//! use dps310::{Dps310, Smbus};
//!
//! let mut bus = Smbus::new(1).unwrap();
//! let mut dps = Dps310::new(&mut bus).unwrap();
//! dps.measure_temperature().unwrap();
//! dps.measure_pressure().unwrap();
//! println!("{:.2} C, {:.2} Pa", dps.temperature(), dps.pressure());
//! ```

pub mod bus;
pub mod calib;
pub mod driver;
pub mod error;
pub mod measure;
pub mod structs;

pub use bus::{HalBus, RegisterAccess, Smbus, DPS310_ADDR};
pub use driver::Dps310;
pub use error::Error;
pub use structs::{CalibrationCoefficients, Diagnostics, Readings, Scaled};
