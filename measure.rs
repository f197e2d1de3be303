//! Conversion of raw 24-bit results into compensated values.

use crate::calib::twos_complement;
use crate::structs::CalibrationCoefficients;

// Result registers, MSB first.
pub const PRES_ADDRS: [u8; 3] = [0x00, 0x01, 0x02];
pub const TEMP_ADDRS: [u8; 3] = [0x03, 0x04, 0x05];

const MEAS_DATA_BITS: u32 = 24;

// Compensation scale factors for 1x temperature and 2x pressure oversampling.
pub const TEMP_SCALE: f64 = 524288.0;
pub const PRES_SCALE: f64 = 1572864.0;

/// Assembles a big-endian 24-bit two's complement reading.
pub fn raw24(bytes: [u8; 3]) -> i32 {
    let raw = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32);
    twos_complement(raw, MEAS_DATA_BITS)
}

pub fn scale_temperature(raw: i32) -> f64 {
    raw as f64 / TEMP_SCALE
}

pub fn scale_pressure(raw: i32) -> f64 {
    raw as f64 / PRES_SCALE
}

pub fn temperature(c: &CalibrationCoefficients, tsc: f64) -> f64 {
    c.c0 * 0.5 + c.c1 * tsc
}

pub fn pressure(c: &CalibrationCoefficients, tsc: f64, psc: f64) -> f64 {
    c.c00
        + psc * (c.c10 + psc * (c.c20 + psc * c.c30))
        + tsc * c.c01
        + tsc * psc * (c.c11 + psc * c.c21)
}
