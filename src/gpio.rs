use crate::types::{Direction, Level};
use crate::Result;
use sysfs_gpio::Pin;

/// One host-visible digital line.
///
/// The production backend is [`SysfsLine`]; tests substitute a fake.
/// Export and unexport belong to the backend (constructor and `Drop` for
/// the sysfs backend): a live value of this trait is a usable line.
pub trait GpioLine {
    /// Set the line direction, driving `level` when configured as output.
    /// The level is ignored for inputs, which float.
    fn configure(&mut self, direction: Direction, level: Level) -> Result<()>;

    /// Read the line's current logic level.
    fn read_level(&mut self) -> Result<Level>;
}

/// GPIO line backed by the kernel sysfs interface (`/sys/class/gpio`).
///
/// Exports the pin on construction; floats and unexports it on drop, so a
/// half-completed device open cannot leak exports.
pub struct SysfsLine {
    pin: Pin,
    number: u64,
}

impl SysfsLine {
    /// Export pin `number` and own it until drop.
    pub fn export(number: u64) -> Result<Self> {
        let pin = Pin::new(number);
        pin.export()?;
        log::debug!("gpio{} exported", number);
        Ok(Self { pin, number })
    }

    /// The kernel pin number this line drives.
    pub fn number(&self) -> u64 {
        self.number
    }
}

impl GpioLine for SysfsLine {
    fn configure(&mut self, direction: Direction, level: Level) -> Result<()> {
        // The "high"/"low" direction values set direction and initial level
        // in one sysfs write instead of a separate direction-then-value pair.
        let dir = match (direction, level) {
            (Direction::Input, _) => sysfs_gpio::Direction::In,
            (Direction::Output, Level::Low) => sysfs_gpio::Direction::Low,
            (Direction::Output, Level::High) => sysfs_gpio::Direction::High,
        };
        self.pin.set_direction(dir)?;
        Ok(())
    }

    fn read_level(&mut self) -> Result<Level> {
        match self.pin.get_value()? {
            0 => Ok(Level::Low),
            _ => Ok(Level::High),
        }
    }
}

impl Drop for SysfsLine {
    fn drop(&mut self) {
        // Best effort: float the line, then hand it back to the kernel.
        if let Err(e) = self.pin.set_direction(sysfs_gpio::Direction::In) {
            log::warn!("gpio{}: release to input failed: {}", self.number, e);
        }
        if let Err(e) = self.pin.unexport() {
            log::warn!("gpio{}: unexport failed: {}", self.number, e);
        }
    }
}
