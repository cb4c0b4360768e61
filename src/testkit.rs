//! Shared fakes for unit tests: scripted GPIO lines and bus endpoints.
//!
//! Fake state lives behind `Arc<Mutex<_>>` so the test keeps a poking
//! handle while the device under test owns the fake.

use crate::bus::I2cBus;
use crate::device::Device;
use crate::gpio::GpioLine;
use crate::types::{Direction, Level};
use crate::{Result, SkywriterError};
use i2cdev::linux::LinuxI2CError;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

// ---- GPIO ----

#[derive(Debug)]
struct LineState {
    direction: Direction,
    driven: Level,
    external: Level,
    ops: Vec<(Direction, Level)>,
    fail_next_configure: bool,
    fail_next_read: bool,
}

/// Fake GPIO line; the paired [`LineHandle`] plays the device side.
pub(crate) struct FakeLine {
    state: Arc<Mutex<LineState>>,
}

/// Test-side handle to a [`FakeLine`].
#[derive(Clone)]
pub(crate) struct LineHandle {
    state: Arc<Mutex<LineState>>,
}

impl FakeLine {
    /// New input line with the device side driving `external`.
    pub fn new(external: Level) -> (Self, LineHandle) {
        let state = Arc::new(Mutex::new(LineState {
            direction: Direction::Input,
            driven: Level::High,
            external,
            ops: Vec::new(),
            fail_next_configure: false,
            fail_next_read: false,
        }));
        let handle = LineHandle {
            state: state.clone(),
        };
        (Self { state }, handle)
    }
}

impl GpioLine for FakeLine {
    fn configure(&mut self, direction: Direction, level: Level) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail_next_configure {
            s.fail_next_configure = false;
            return Err(SkywriterError::Gpio(sysfs_gpio::Error::Unexpected(
                "injected configure failure".into(),
            )));
        }
        s.direction = direction;
        if direction == Direction::Output {
            s.driven = level;
        }
        s.ops.push((direction, level));
        Ok(())
    }

    fn read_level(&mut self) -> Result<Level> {
        let mut s = self.state.lock().unwrap();
        if s.fail_next_read {
            s.fail_next_read = false;
            return Err(SkywriterError::Gpio(sysfs_gpio::Error::Unexpected(
                "injected read failure".into(),
            )));
        }
        Ok(match s.direction {
            Direction::Input => s.external,
            Direction::Output => s.driven,
        })
    }
}

impl LineHandle {
    /// Drive the device side of the line (what the host sees on an input).
    pub fn drive(&self, level: Level) {
        self.state.lock().unwrap().external = level;
    }

    /// Every configure() the host performed, in order.
    pub fn ops(&self) -> Vec<(Direction, Level)> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn fail_next_configure(&self) {
        self.state.lock().unwrap().fail_next_configure = true;
    }

    pub fn fail_next_read(&self) {
        self.state.lock().unwrap().fail_next_read = true;
    }

    /// True once the host side of the line has been dropped.
    pub fn line_dropped(&self) -> bool {
        Arc::strong_count(&self.state) == 1
    }
}

// ---- Bus ----

#[derive(Debug, Default)]
struct BusState {
    frames: VecDeque<io::Result<Vec<u8>>>,
    writes: Vec<(u8, Vec<u8>)>,
    reads: usize,
    fail_next_write: bool,
}

/// Fake I2C endpoint serving scripted frames.
pub(crate) struct FakeBus {
    state: Arc<Mutex<BusState>>,
}

/// Test-side handle to a [`FakeBus`].
#[derive(Clone)]
pub(crate) struct BusHandle {
    state: Arc<Mutex<BusState>>,
}

impl FakeBus {
    pub fn new() -> (Self, BusHandle) {
        let state = Arc::new(Mutex::new(BusState::default()));
        let handle = BusHandle {
            state: state.clone(),
        };
        (Self { state }, handle)
    }
}

impl I2cBus for FakeBus {
    fn read_block(&mut self, _register: u8, len: u8) -> Result<Vec<u8>> {
        let mut s = self.state.lock().unwrap();
        s.reads += 1;
        match s.frames.pop_front() {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(e)) => Err(SkywriterError::Bus(LinuxI2CError::Io(e))),
            None => Ok(vec![0; len as usize]),
        }
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail_next_write {
            s.fail_next_write = false;
            return Err(SkywriterError::Bus(LinuxI2CError::Io(io::Error::other(
                "injected write failure",
            ))));
        }
        s.writes.push((register, bytes.to_vec()));
        Ok(())
    }
}

impl BusHandle {
    /// Queue a frame for the next block read.
    pub fn push_frame(&self, frame: Vec<u8>) {
        self.state.lock().unwrap().frames.push_back(Ok(frame));
    }

    /// Queue an I/O error for the next block read.
    pub fn fail_next_read(&self) {
        self.state
            .lock()
            .unwrap()
            .frames
            .push_back(Err(io::Error::other("injected read failure")));
    }

    pub fn fail_next_write(&self) {
        self.state.lock().unwrap().fail_next_write = true;
    }

    /// Every write_block() performed, in order.
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Number of block reads performed.
    pub fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }
}

// ---- Rigged device ----

/// Test-side handles for a rigged fake device.
pub(crate) struct Rig {
    pub reset: LineHandle,
    pub xfer: LineHandle,
    pub bus: BusHandle,
}

/// A session over fakes, skipping the (slow) open handshake. The xfer line
/// idles high (not ready) until the rig drives it low.
pub(crate) fn rigged_device() -> (Device<FakeBus, FakeLine>, Rig) {
    let (reset, reset_h) = FakeLine::new(Level::High);
    let (xfer, xfer_h) = FakeLine::new(Level::High);
    let (bus, bus_h) = FakeBus::new();
    let device = Device::assemble(bus, reset, xfer);
    let rig = Rig {
        reset: reset_h,
        xfer: xfer_h,
        bus: bus_h,
    };
    (device, rig)
}
