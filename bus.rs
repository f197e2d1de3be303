use embedded_hal::i2c::{ErrorType, I2c as HalI2c};
use log::debug;
use rppal::i2c::I2c;

// DPS310 I2C slave address (SDO high).
pub const DPS310_ADDR: u8 = 0x77;

/// Single-byte register access against a sensor at a fixed bus address.
pub trait RegisterAccess {
    type Error;

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error>;

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;
}

/// SMBus byte transfers through the Raspberry Pi I2C controller.
pub struct Smbus {
    i2c: I2c,
}

impl Smbus {
    /// Opens `/dev/i2c-<bus>` and selects the DPS310.
    pub fn new(bus: u8) -> Result<Self, rppal::i2c::Error> {
        Self::with_i2c(I2c::with_bus(bus)?)
    }

    pub fn with_i2c(mut i2c: I2c) -> Result<Self, rppal::i2c::Error> {
        i2c.set_slave_address(DPS310_ADDR as u16)?;
        debug!("using I2C bus {} at 0x{:02x}", i2c.bus(), DPS310_ADDR);
        Ok(Smbus { i2c })
    }
}

impl RegisterAccess for Smbus {
    type Error = rppal::i2c::Error;

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error> {
        self.i2c.smbus_read_byte(reg)
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.smbus_write_byte(reg, value)
    }
}

/// Register access over any `embedded-hal` I2C implementation.
pub struct HalBus<I> {
    i2c: I,
}

impl<I: HalI2c> HalBus<I> {
    pub fn new(i2c: I) -> Self {
        HalBus { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: HalI2c> RegisterAccess for HalBus<I> {
    type Error = <I as ErrorType>::Error;

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(DPS310_ADDR, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(DPS310_ADDR, &[reg, value])
    }
}
