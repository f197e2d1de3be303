use std::fmt;

/// Errors returned by the DPS310 driver, generic over the bus error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The underlying register transfer failed (device absent, NACK, ...).
    Bus(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "I2C bus error: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for Error<E> {}

pub type Result<T, E> = std::result::Result<T, Error<E>>;
