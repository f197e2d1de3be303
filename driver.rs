use log::{debug, trace, warn};

use crate::bus::RegisterAccess;
use crate::calib::read_calibration;
use crate::error::{Error, Result};
use crate::measure::{self, PRES_ADDRS, TEMP_ADDRS};
use crate::structs::{CalibrationCoefficients, Diagnostics, Readings, Scaled};

// DPS310 register addresses.
const REG_PRS_CFG: u8 = 0x06;
const REG_TMP_CFG: u8 = 0x07;
const REG_MEAS_CFG: u8 = 0x08;
const REG_CFG: u8 = 0x09;

const PRS_CFG_VALUE: u8 = 0x01; // 1 measurement/s, 2x oversampling
const TMP_CFG_VALUE: u8 = 0x80; // external (MEMS) sensor, 1 measurement/s, no oversampling
const CFG_VALUE: u8 = 0x00; // no interrupts, no FIFO, no result shift

const MEAS_PRESSURE: u8 = 0x01;
const MEAS_TEMPERATURE: u8 = 0x02;

/// DPS310 driver in command (one-shot) mode.
///
/// The bus is borrowed for the driver's lifetime. Pressure compensation
/// uses the scaled temperature of the last `measure_temperature` call, so
/// both should be measured in the same cycle, temperature first.
pub struct Dps310<'a, B: RegisterAccess> {
    bus: &'a mut B,
    coefficients: CalibrationCoefficients,
    raw_temperature: i32,
    raw_pressure: i32,
    scaled: Scaled,
    readings: Readings,
    has_temperature: bool,
}

impl<'a, B: RegisterAccess> Dps310<'a, B> {
    /// Configures the sensor and reads its calibration coefficients.
    ///
    /// No driver is returned if any transfer fails.
    pub fn new(bus: &'a mut B) -> Result<Self, B::Error> {
        write_reg(bus, REG_PRS_CFG, PRS_CFG_VALUE)?;
        write_reg(bus, REG_TMP_CFG, TMP_CFG_VALUE)?;
        write_reg(bus, REG_CFG, CFG_VALUE)?;

        let coefficients = read_calibration(bus)?;

        Ok(Dps310 {
            bus,
            coefficients,
            raw_temperature: 0,
            raw_pressure: 0,
            scaled: Scaled::default(),
            readings: Readings::default(),
            has_temperature: false,
        })
    }

    /// Triggers a temperature measurement and reads its result.
    ///
    /// The result registers are read straight after the trigger; the caller
    /// is responsible for leaving the sensor enough time between cycles.
    pub fn measure_temperature(&mut self) -> Result<(), B::Error> {
        let raw = self.trigger_and_read(MEAS_TEMPERATURE, &TEMP_ADDRS)?;
        let tsc = measure::scale_temperature(raw);

        self.raw_temperature = raw;
        self.scaled.tsc = tsc;
        self.readings.temperature = measure::temperature(&self.coefficients, tsc);
        self.has_temperature = true;
        Ok(())
    }

    /// Triggers a pressure measurement and compensates it with the most
    /// recent scaled temperature.
    pub fn measure_pressure(&mut self) -> Result<(), B::Error> {
        let raw = self.trigger_and_read(MEAS_PRESSURE, &PRES_ADDRS)?;
        let psc = measure::scale_pressure(raw);

        if !self.has_temperature {
            warn!("pressure compensated without a temperature measurement");
        }

        self.raw_pressure = raw;
        self.scaled.psc = psc;
        self.readings.pressure = measure::pressure(&self.coefficients, self.scaled.tsc, psc);
        Ok(())
    }

    pub fn temperature(&self) -> f64 {
        self.readings.temperature
    }

    pub fn pressure(&self) -> f64 {
        self.readings.pressure
    }

    pub fn readings(&self) -> Readings {
        self.readings
    }

    pub fn coefficients(&self) -> &CalibrationCoefficients {
        &self.coefficients
    }

    pub fn scaled(&self) -> Scaled {
        self.scaled
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            coefficients: self.coefficients,
            raw_temperature: self.raw_temperature,
            raw_pressure: self.raw_pressure,
            scaled: self.scaled,
        }
    }

    fn trigger_and_read(&mut self, mode: u8, addrs: &[u8; 3]) -> Result<i32, B::Error> {
        write_reg(self.bus, REG_MEAS_CFG, mode)?;

        let mut bytes = [0u8; 3];
        for (byte, &addr) in bytes.iter_mut().zip(addrs.iter()) {
            *byte = self.bus.read(addr).map_err(Error::Bus)?;
        }
        trace!("result 0x{:02x}..: {:02x?}", addrs[0], bytes);

        Ok(measure::raw24(bytes))
    }
}

fn write_reg<B: RegisterAccess>(bus: &mut B, reg: u8, value: u8) -> Result<(), B::Error> {
    debug!("write 0x{:02x} <- 0x{:02x}", reg, value);
    bus.write(reg, value).map_err(Error::Bus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{HalBus, DPS310_ADDR};
    use crate::calib::COEF_ADDRS;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::collections::HashMap;

    const COEFS: [u8; 18] = [
        0x0D, 0x2F, 0xF9, 0x13, 0x5A, 0x1F, 0x5B, 0x12, 0xF6, 0x77, 0x04, 0x98, 0x20, 0x11, 0x00,
        0x1C, 0xFE, 0xCB,
    ];
    // raw -262144, tsc -0.5
    const TEMP_RAW: [u8; 3] = [0xFC, 0x00, 0x00];
    // raw 1572864, psc 1.0
    const PRES_RAW: [u8; 3] = [0x18, 0x00, 0x00];

    #[derive(Debug, PartialEq)]
    struct FakeError;

    #[derive(Default)]
    struct FakeBus {
        regs: HashMap<u8, u8>,
        writes: Vec<(u8, u8)>,
        reads: usize,
        fail_at_read: Option<usize>,
        fail_reg: Option<u8>,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut bus = FakeBus::default();
            bus.load(&COEF_ADDRS, &COEFS);
            bus.load(&TEMP_ADDRS, &TEMP_RAW);
            bus.load(&PRES_ADDRS, &PRES_RAW);
            bus
        }

        fn load(&mut self, addrs: &[u8], data: &[u8]) {
            for (&a, &d) in addrs.iter().zip(data.iter()) {
                self.regs.insert(a, d);
            }
        }
    }

    impl RegisterAccess for FakeBus {
        type Error = FakeError;

        fn read(&mut self, reg: u8) -> std::result::Result<u8, FakeError> {
            self.reads += 1;
            if self.fail_at_read == Some(self.reads) || self.fail_reg == Some(reg) {
                return Err(FakeError);
            }
            Ok(self.regs.get(&reg).copied().unwrap_or(0))
        }

        fn write(&mut self, reg: u8, value: u8) -> std::result::Result<(), FakeError> {
            if self.fail_reg == Some(reg) {
                return Err(FakeError);
            }
            self.writes.push((reg, value));
            Ok(())
        }
    }

    #[test]
    fn new_configures_then_reads_calibration() {
        let mut bus = FakeBus::new();
        let dps = Dps310::new(&mut bus).unwrap();

        assert_eq!(dps.coefficients().c0, 210.0);
        assert_eq!(dps.coefficients().c30, -309.0);
        assert_eq!(dps.readings(), Readings::default());
        assert_eq!(dps.scaled(), Scaled::default());
        drop(dps);

        assert_eq!(bus.writes, vec![(0x06, 0x01), (0x07, 0x80), (0x09, 0x00)]);
        assert_eq!(bus.reads, 18);
    }

    #[test]
    fn new_fails_on_tenth_coefficient_read() {
        let mut bus = FakeBus::new();
        bus.fail_at_read = Some(10);

        assert!(matches!(Dps310::new(&mut bus), Err(Error::Bus(FakeError))));
        assert_eq!(bus.reads, 10);
    }

    #[test]
    fn new_fails_on_config_write() {
        let mut bus = FakeBus::new();
        bus.fail_reg = Some(REG_TMP_CFG);

        assert!(Dps310::new(&mut bus).is_err());
        assert_eq!(bus.writes, vec![(0x06, 0x01)]);
        assert_eq!(bus.reads, 0);
    }

    #[test]
    fn measure_cycle() {
        let mut bus = FakeBus::new();
        let mut dps = Dps310::new(&mut bus).unwrap();

        dps.measure_temperature().unwrap();
        assert_eq!(dps.scaled().tsc, -0.5);
        assert_eq!(dps.temperature(), 108.5);

        dps.measure_pressure().unwrap();
        assert_eq!(dps.scaled().psc, 1.0);
        // 79265 + (-42222 + 8209 - 309) + 0.5 * 2441 - 0.5 * (1176 + 28)
        assert_eq!(dps.pressure(), 45561.5);

        let diag = dps.diagnostics();
        assert_eq!(diag.raw_temperature, -262144);
        assert_eq!(diag.raw_pressure, 1572864);
        drop(dps);

        assert_eq!(&bus.writes[3..], &[(0x08, 0x02), (0x08, 0x01)]);
        assert_eq!(bus.reads, 24);
    }

    #[test]
    fn cached_values_are_stable() {
        let mut bus = FakeBus::new();
        let mut dps = Dps310::new(&mut bus).unwrap();
        dps.measure_temperature().unwrap();
        dps.measure_pressure().unwrap();

        let first = dps.readings();
        for _ in 0..3 {
            assert_eq!(dps.temperature(), first.temperature);
            assert_eq!(dps.pressure(), first.pressure);
        }
    }

    #[test]
    fn pressure_without_temperature_uses_zero_tsc() {
        let mut bus = FakeBus::new();
        let mut dps = Dps310::new(&mut bus).unwrap();

        dps.measure_pressure().unwrap();
        // 79265 - 42222 + 8209 - 309
        assert_eq!(dps.pressure(), 44943.0);
        assert_eq!(dps.temperature(), 0.0);
    }

    #[test]
    fn failed_measurement_keeps_previous_values() {
        let mut bus = FakeBus::new();
        let mut dps = Dps310::new(&mut bus).unwrap();
        dps.measure_temperature().unwrap();
        dps.measure_pressure().unwrap();
        let before = dps.diagnostics();
        let readings = dps.readings();

        // New data on the sensor, but the transfer breaks halfway.
        dps.bus.regs.insert(PRES_ADDRS[0], 0x7F);
        dps.bus.regs.insert(TEMP_ADDRS[0], 0x01);
        dps.bus.fail_reg = Some(PRES_ADDRS[1]);
        assert!(dps.measure_pressure().is_err());
        dps.bus.fail_reg = Some(TEMP_ADDRS[2]);
        assert!(dps.measure_temperature().is_err());
        dps.bus.fail_reg = Some(REG_MEAS_CFG);
        assert!(dps.measure_temperature().is_err());

        assert_eq!(dps.readings(), readings);
        assert_eq!(dps.diagnostics(), before);
    }

    #[test]
    fn end_to_end_over_i2c() {
        let mut expectations = vec![
            I2cTransaction::write(DPS310_ADDR, vec![0x06, 0x01]),
            I2cTransaction::write(DPS310_ADDR, vec![0x07, 0x80]),
            I2cTransaction::write(DPS310_ADDR, vec![0x09, 0x00]),
        ];
        for (&addr, &value) in COEF_ADDRS.iter().zip(COEFS.iter()) {
            expectations.push(I2cTransaction::write_read(DPS310_ADDR, vec![addr], vec![value]));
        }
        expectations.push(I2cTransaction::write(DPS310_ADDR, vec![0x08, 0x02]));
        for (&addr, &value) in TEMP_ADDRS.iter().zip(TEMP_RAW.iter()) {
            expectations.push(I2cTransaction::write_read(DPS310_ADDR, vec![addr], vec![value]));
        }
        expectations.push(I2cTransaction::write(DPS310_ADDR, vec![0x08, 0x01]));
        for (&addr, &value) in PRES_ADDRS.iter().zip(PRES_RAW.iter()) {
            expectations.push(I2cTransaction::write_read(DPS310_ADDR, vec![addr], vec![value]));
        }

        let mut bus = HalBus::new(I2cMock::new(&expectations));
        let mut dps = Dps310::new(&mut bus).unwrap();
        dps.measure_temperature().unwrap();
        dps.measure_pressure().unwrap();

        assert_eq!(dps.temperature(), 108.5);
        assert_eq!(dps.pressure(), 45561.5);
        drop(dps);

        let mut i2c = bus.release();
        i2c.done();
    }

    #[test]
    fn end_to_end_bus_error() {
        let mut expectations = vec![
            I2cTransaction::write(DPS310_ADDR, vec![0x06, 0x01]),
            I2cTransaction::write(DPS310_ADDR, vec![0x07, 0x80]),
            I2cTransaction::write(DPS310_ADDR, vec![0x09, 0x00]),
        ];
        for &addr in &COEF_ADDRS[..9] {
            expectations.push(I2cTransaction::write_read(DPS310_ADDR, vec![addr], vec![0]));
        }
        expectations.push(
            I2cTransaction::write_read(DPS310_ADDR, vec![COEF_ADDRS[9]], vec![0])
                .with_error(ErrorKind::Other),
        );

        let mut bus = HalBus::new(I2cMock::new(&expectations));
        let err = Dps310::new(&mut bus).err();
        assert_eq!(err, Some(Error::Bus(ErrorKind::Other)));

        let mut i2c = bus.release();
        i2c.done();
    }
}
