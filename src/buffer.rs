use crate::types::Sample;
use std::sync::{Arc, Mutex};

/// Single-slot, newest-wins sample store.
///
/// One mutex-guarded slot shared between the poll thread and any number
/// of readers. Publishing overwrites whatever was there; snapshots copy
/// the slot out without blocking the writer for longer than the copy.
/// Readers that poll faster than the sensor see the same sample twice,
/// readers that poll slower miss intermediate ones. Both are fine for
/// gesture tracking, where only the most recent position matters.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    slot: Mutex<Sample>,
}

impl SampleBuffer {
    /// An empty buffer. Snapshots taken before the first publish return
    /// the zero-valued [`Sample`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with `sample`.
    pub fn publish(&self, sample: Sample) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = sample;
    }

    /// Copy out the latest sample.
    pub fn snapshot(&self) -> Sample {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Destination for decoded samples on the poll thread.
///
/// The poller pushes into a sink instead of handing out an iterator, so
/// consumers choose their own delivery: a shared [`SampleBuffer`], or any
/// `Fn(Sample) + Send` closure.
pub trait SampleSink: Send {
    fn publish(&self, sample: Sample);
}

impl SampleSink for SampleBuffer {
    fn publish(&self, sample: Sample) {
        SampleBuffer::publish(self, sample);
    }
}

impl SampleSink for Arc<SampleBuffer> {
    fn publish(&self, sample: Sample) {
        SampleBuffer::publish(self, sample);
    }
}

impl<F: Fn(Sample) + Send> SampleSink for F {
    fn publish(&self, sample: Sample) {
        self(sample);
    }
}
