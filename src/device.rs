use crate::bus::I2cBus;
use crate::gpio::{GpioLine, SysfsLine};
use crate::protocol::{self, FrameDecoder, HexDumpDecoder};
use crate::types::{Direction, Level, Sample};
use crate::Result;
use i2cdev::linux::LinuxI2CDevice;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// An open gesture-sensor session: one bus endpoint plus the reset and
/// xfer GPIO lines, fully initialized and streaming.
///
/// Generic over the bus and line backends so the transfer cycle can run
/// against fakes; production code uses the defaults.
pub struct Device<B: I2cBus = LinuxI2CDevice, L: GpioLine = SysfsLine> {
    bus: B,
    reset: L,
    xfer: L,
    decoder: Box<dyn FrameDecoder>,
    cooldown: Duration,
    not_before: Option<Instant>,
    released: bool,
}

impl Device {
    /// Open and initialize the sensor: export and configure both GPIO
    /// lines, pulse reset, sit out the settle period, bind the slave
    /// address on `bus_path`, and send the streaming command.
    ///
    /// Blocks for at least 400 ms (reset pulse + settle). Each step is a
    /// failure point that aborts the sequence; lines already exported are
    /// released again before the error returns. No retries here; callers
    /// retry `open` wholesale if they want to.
    pub fn open<P: AsRef<Path>>(bus_path: P, reset_pin: u64, xfer_pin: u64) -> Result<Self> {
        let bus_path = bus_path.as_ref();
        let mut reset = SysfsLine::export(reset_pin)?;
        let mut xfer = SysfsLine::export(xfer_pin)?;
        reset_handshake(&mut reset, &mut xfer)?;
        let mut bus = LinuxI2CDevice::new(bus_path, protocol::DEVICE_ADDR)?;
        begin_streaming(&mut bus)?;
        log::info!(
            "sensor up on {} (addr 0x{:02x}, reset gpio{}, xfer gpio{})",
            bus_path.display(),
            protocol::DEVICE_ADDR,
            reset_pin,
            xfer_pin
        );
        Ok(Self::assemble(bus, reset, xfer))
    }
}

impl<B: I2cBus, L: GpioLine> Device<B, L> {
    /// Open a session over already-acquired parts: same reset handshake
    /// and streaming command as [`Device::open`], on a bus that is already
    /// bound to the device address.
    pub fn open_with(mut bus: B, mut reset: L, mut xfer: L) -> Result<Self> {
        reset_handshake(&mut reset, &mut xfer)?;
        begin_streaming(&mut bus)?;
        Ok(Self::assemble(bus, reset, xfer))
    }

    pub(crate) fn assemble(bus: B, reset: L, xfer: L) -> Self {
        Self {
            bus,
            reset,
            xfer,
            decoder: Box::new(HexDumpDecoder),
            cooldown: protocol::XFER_COOLDOWN,
            not_before: None,
            released: false,
        }
    }

    /// Swap the frame decoder. The stock [`HexDumpDecoder`] only logs;
    /// closures `FnMut(&[u8]) -> Option<Sample> + Send` qualify.
    pub fn set_decoder<D: FrameDecoder + 'static>(&mut self, decoder: D) {
        self.decoder = Box::new(decoder);
    }

    /// Run one transfer cycle.
    ///
    /// Reads the active-low xfer line; when the sensor signals data ready,
    /// drains one 32-byte frame while holding the line low, releases the
    /// line, and hands the frame to the decoder. Returns `Ok(None)` when
    /// the sensor has nothing queued (the cheap, common case) and for
    /// any call landing inside the 200 µs post-drain cooldown. The
    /// cooldown is tracked as a monotonic not-before instant rather than
    /// slept through, so a poll loop keeps observing its cancellation
    /// token.
    pub fn poll_once(&mut self) -> Result<Option<Sample>> {
        if let Some(t) = self.not_before {
            if Instant::now() < t {
                return Ok(None);
            }
            self.not_before = None;
        }
        if self.xfer.read_level()? != Level::Low {
            return Ok(None);
        }
        self.drain()
    }

    // One frame while holding the xfer line low; the sensor must not
    // overwrite its output buffer mid-read.
    fn drain(&mut self) -> Result<Option<Sample>> {
        self.xfer.configure(Direction::Output, Level::Low)?;
        let read = self
            .bus
            .read_block(protocol::DATA_REGISTER, protocol::FRAME_LEN);
        // Release before surfacing the read result: a failed read must not
        // leave the sensor stalled behind an asserted line.
        let release = self.xfer.configure(Direction::Input, Level::High);
        self.not_before = Some(Instant::now() + self.cooldown);
        let frame = read?;
        release?;
        if frame.is_empty() {
            return Ok(None);
        }
        Ok(self.decoder.decode(&frame))
    }

    /// Shut the session down: float both GPIO lines and release the bus
    /// handle. Best effort: every teardown step runs regardless of
    /// earlier step failures. Dropping the session does the same.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.xfer.configure(Direction::Input, Level::High) {
            log::warn!("xfer line release failed: {}", e);
        }
        if let Err(e) = self.reset.configure(Direction::Input, Level::High) {
            log::warn!("reset line release failed: {}", e);
        }
        log::info!("sensor session closed");
    }

    #[cfg(test)]
    pub(crate) fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }
}

impl<B: I2cBus, L: GpioLine> Drop for Device<B, L> {
    fn drop(&mut self) {
        self.release();
    }
}

// Both lines to their idle states, a 100 ms low pulse on reset, then the
// settle period the sensor needs before it will talk.
fn reset_handshake<L: GpioLine>(reset: &mut L, xfer: &mut L) -> Result<()> {
    reset.configure(Direction::Output, Level::High)?;
    xfer.configure(Direction::Input, Level::High)?;
    log::debug!(
        "reset pulse: {} ms low, {} ms settle",
        protocol::RESET_PULSE.as_millis(),
        protocol::RESET_SETTLE.as_millis()
    );
    reset.configure(Direction::Output, Level::Low)?;
    thread::sleep(protocol::RESET_PULSE);
    reset.configure(Direction::Output, Level::High)?;
    thread::sleep(protocol::RESET_SETTLE);
    Ok(())
}

// The one firmware command this driver knows: start streaming samples.
fn begin_streaming<B: I2cBus>(bus: &mut B) -> Result<()> {
    bus.write_block(protocol::CMD_REGISTER, &protocol::START_STREAMING)
}
