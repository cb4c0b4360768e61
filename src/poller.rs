use crate::buffer::SampleSink;
use crate::bus::I2cBus;
use crate::device::Device;
use crate::error::SkywriterError;
use crate::gpio::{GpioLine, SysfsLine};
use crate::protocol;
use crate::Result;
use i2cdev::linux::LinuxI2CDevice;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Cooperative stop signal shared between a poll loop and its owner.
///
/// Clones observe the same flag. Cancellation is one-way and sticky:
/// once cancelled, a token stays cancelled. The poll loop checks it
/// between devices, so a stop request lands within one transfer cycle.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

struct Entry<B: I2cBus, L: GpioLine> {
    device: Device<B, L>,
    sink: Box<dyn SampleSink>,
}

/// Drives any number of sensor sessions through their transfer cycles,
/// pushing decoded samples into each session's sink.
///
/// Use [`Poller::run`] to poll on the current thread, or
/// [`Poller::spawn`] to hand the whole set to a background thread and
/// keep a [`PollHandle`] for shutdown.
pub struct Poller<B: I2cBus = LinuxI2CDevice, L: GpioLine = SysfsLine> {
    entries: Vec<Entry<B, L>>,
}

impl<B: I2cBus, L: GpioLine> Default for Poller<B, L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<B: I2cBus, L: GpioLine> Poller<B, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device together with the sink its samples go to.
    pub fn add<S: SampleSink + 'static>(&mut self, device: Device<B, L>, sink: S) {
        self.entries.push(Entry {
            device,
            sink: Box::new(sink),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Poll every device once, in registration order. Returns how many
    /// samples were published. A device that errors is logged and
    /// skipped for this pass; the others still get their turn. The
    /// token is consulted before each device, so a cancelled pass ends
    /// early.
    pub fn poll_pass(&mut self, token: &CancelToken) -> usize {
        let mut published = 0;
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            if token.is_cancelled() {
                break;
            }
            match entry.device.poll_once() {
                Ok(Some(sample)) => {
                    entry.sink.publish(sample);
                    published += 1;
                }
                Ok(None) => {}
                Err(e) => log::warn!("device {}: poll error: {}", idx, e),
            }
        }
        published
    }

    /// Poll until the token is cancelled. Passes that publish nothing
    /// are followed by a short sleep so an idle sensor set does not
    /// spin a core.
    pub fn run(&mut self, token: &CancelToken) {
        while !token.is_cancelled() {
            if self.poll_pass(token) == 0 {
                thread::sleep(protocol::XFER_COOLDOWN);
            }
        }
    }

    /// Take the devices back, dropping the sinks.
    pub fn into_devices(self) -> Vec<Device<B, L>> {
        self.entries.into_iter().map(|e| e.device).collect()
    }

    /// Move the poller onto a named background thread. The worker polls
    /// until the token is cancelled, then closes every device before
    /// exiting. The returned handle joins the worker on [`PollHandle::stop`]
    /// or on drop.
    pub fn spawn(mut self, token: CancelToken) -> Result<PollHandle>
    where
        B: Send + 'static,
        L: Send + 'static,
    {
        let worker_token = token.clone();
        let thread = thread::Builder::new()
            .name("skywriter-poll".into())
            .spawn(move || {
                self.run(&worker_token);
                for device in self.into_devices() {
                    device.close();
                }
            })
            .map_err(|e| SkywriterError::Thread(format!("failed to spawn poll thread: {}", e)))?;
        log::debug!("poll thread started");
        Ok(PollHandle {
            cancel: token,
            thread: Some(thread),
        })
    }
}

/// Owner's end of a background poll thread.
pub struct PollHandle {
    cancel: CancelToken,
    thread: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// A token tied to this thread; cancelling it stops the worker.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancel and join the worker. Devices are closed by the worker
    /// itself before it exits.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("poll thread panicked");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
