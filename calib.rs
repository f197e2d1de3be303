//! Decoding of the DPS310 coefficient block (registers 0x10 - 0x21).
//!
//! The nine coefficients are packed big-endian into 18 bytes. `c0`/`c1`
//! share byte 1 and `c00`/`c10` share byte 5, split at the nibble.

use log::debug;

use crate::bus::RegisterAccess;
use crate::error::{Error, Result};
use crate::structs::CalibrationCoefficients;

pub const COEF_ADDRS: [u8; 18] = [
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E,
    0x1F, 0x20, 0x21,
];

const C0_C1_BITS: u32 = 12;
const C00_C10_BITS: u32 = 20;
const C01_C30_BITS: u32 = 16;

/// Reinterprets the low `width` bits of `value` as a two's complement integer.
pub fn twos_complement(value: u32, width: u32) -> i32 {
    let value = value as i32;
    if value > (1 << (width - 1)) - 1 {
        value - (1 << width)
    } else {
        value
    }
}

fn be16(hi: u8, lo: u8) -> u32 {
    ((hi as u32) << 8) | (lo as u32)
}

pub fn decode(b: &[u8; 18]) -> CalibrationCoefficients {
    let c0 = ((b[0] as u32) << 4) | (((b[1] as u32) >> 4) & 0x0F);
    let c1 = (((b[1] as u32) & 0x0F) << 8) | (b[2] as u32);
    let c00 = ((b[3] as u32) << 12) | ((b[4] as u32) << 4) | (((b[5] as u32) >> 4) & 0x0F);
    let c10 = (((b[5] as u32) & 0x0F) << 16) | ((b[6] as u32) << 8) | (b[7] as u32);

    let signed = |v: u32, width: u32| twos_complement(v, width) as f64;

    CalibrationCoefficients {
        c0: signed(c0, C0_C1_BITS),
        c1: signed(c1, C0_C1_BITS),
        c00: signed(c00, C00_C10_BITS),
        c10: signed(c10, C00_C10_BITS),
        c01: signed(be16(b[8], b[9]), C01_C30_BITS),
        c11: signed(be16(b[10], b[11]), C01_C30_BITS),
        c20: signed(be16(b[12], b[13]), C01_C30_BITS),
        c21: signed(be16(b[14], b[15]), C01_C30_BITS),
        c30: signed(be16(b[16], b[17]), C01_C30_BITS),
    }
}

/// Reads the coefficient block one register at a time and decodes it.
///
/// Stops at the first failed read; nothing is retried.
pub fn read_calibration<B: RegisterAccess>(bus: &mut B) -> Result<CalibrationCoefficients, B::Error> {
    let mut raw = [0u8; 18];
    for (byte, &addr) in raw.iter_mut().zip(COEF_ADDRS.iter()) {
        *byte = bus.read(addr).map_err(Error::Bus)?;
    }

    let coefficients = decode(&raw);
    debug!("calibration coefficients: {:?}", coefficients);
    Ok(coefficients)
}
