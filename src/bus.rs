//! Byte-wide register access used by the driver.
//!
//! The driver only ever reads or writes whole 8-bit registers. Anything which can
//! do that for addresses in the device access window can sit underneath it.

use crate::register::RegisterAddress;

/// Single register read and write.
///
/// Implementations are expected to serialize access to the physical bus
/// themselves. No retries are attempted on top of this trait.
pub trait RegisterBus {
    type Error: core::fmt::Debug;

    fn write_register(&mut self, address: RegisterAddress, value: u8) -> Result<(), Self::Error>;

    fn read_register(&mut self, address: RegisterAddress) -> Result<u8, Self::Error>;
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    type Error = T::Error;

    fn write_register(&mut self, address: RegisterAddress, value: u8) -> Result<(), Self::Error> {
        T::write_register(self, address, value)
    }

    fn read_register(&mut self, address: RegisterAddress) -> Result<u8, Self::Error> {
        T::read_register(self, address)
    }
}

/// [`RegisterBus`] over a blocking `embedded-hal` I2C bus.
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cBus<I2C> {
    /// Create a bus talking to the device at the 7-bit `address`.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterBus for I2cBus<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;

    fn write_register(&mut self, address: RegisterAddress, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[address.get(), value])
    }

    fn read_register(&mut self, address: RegisterAddress) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[address.get()], &mut buf)?;
        Ok(buf[0])
    }
}
