//! # skywriter - Linux driver for the Skywriter (MGC3130) gesture sensor
//!
//! Userspace driver over `/dev/i2c-*` and sysfs GPIO. Provides:
//! - Device bring-up (reset pulse, settle, streaming command) and teardown
//! - The ready/drain/cooldown transfer cycle gated by the active-low xfer line
//! - A latest-value sample buffer for render-rate consumers
//! - Foreground and background polling with cooperative cancellation
//! - C FFI for integration with C/C++ hosts
//!
//! ## Quick Start
//! ```no_run
//! use skywriter::{CancelToken, Device, Poller, SampleBuffer};
//! use std::sync::Arc;
//!
//! let device = Device::open("/dev/i2c-1", 48, 51).unwrap();
//! let buffer = Arc::new(SampleBuffer::new());
//!
//! let mut poller = Poller::new();
//! poller.add(device, buffer.clone());
//!
//! let cancel = CancelToken::new();
//! let handle = poller.spawn(cancel.clone()).unwrap();
//! for _ in 0..100 {
//!     let sample = buffer.snapshot();
//!     println!("pos: ({}, {}, {})", sample.x, sample.y, sample.z);
//!     std::thread::sleep(std::time::Duration::from_millis(16));
//! }
//! handle.stop();
//! ```

pub mod error;
pub mod types;
pub mod protocol;
pub mod gpio;
pub mod bus;
pub mod device;
pub mod buffer;
pub mod poller;
pub mod ffi;

#[cfg(test)]
pub(crate) mod testkit;

pub use buffer::{SampleBuffer, SampleSink};
pub use bus::I2cBus;
pub use device::Device;
pub use error::SkywriterError;
pub use gpio::{GpioLine, SysfsLine};
pub use poller::{CancelToken, PollHandle, Poller};
pub use protocol::{hex_frame, FrameDecoder, HexDumpDecoder};
pub use types::*;

/// Result type alias for skywriter operations.
pub type Result<T> = std::result::Result<T, SkywriterError>;
