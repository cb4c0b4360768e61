use crate::Result;
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;

/// One addressed endpoint on an I2C bus.
///
/// The production backend is `i2cdev`'s [`LinuxI2CDevice`], already bound
/// to the device's slave address; tests substitute a fake. Only the two
/// SMBus block transactions the sensor protocol needs are exposed.
pub trait I2cBus {
    /// Read up to `len` bytes from `register` in one block transaction.
    fn read_block(&mut self, register: u8, len: u8) -> Result<Vec<u8>>;

    /// Write `bytes` to `register` in one block transaction.
    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<()>;
}

impl I2cBus for LinuxI2CDevice {
    fn read_block(&mut self, register: u8, len: u8) -> Result<Vec<u8>> {
        Ok(self.smbus_read_i2c_block_data(register, len)?)
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<()> {
        Ok(self.smbus_write_i2c_block_data(register, bytes)?)
    }
}
