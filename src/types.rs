use std::time::{SystemTime, UNIX_EPOCH};

/// One decoded gesture sample.
///
/// Coordinate convention and scale are set by the decoder that produced the
/// sample; the driver itself never interprets them. The zero-value sample
/// (`Sample::default()`) is what consumers see before the first publish.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    /// Position along the sensing plane's x axis.
    pub x: f64,
    /// Position along the sensing plane's y axis.
    pub y: f64,
    /// Height above the sensing plane.
    pub z: f64,
    /// Wall-clock capture timestamp, microseconds since the UNIX epoch.
    pub timestamp_us: u64,
}

impl Sample {
    /// Build a sample stamped with the current wall-clock time.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            x,
            y,
            z,
            timestamp_us: now.as_micros() as u64,
        }
    }
}

/// Direction of a GPIO line as seen from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Driven by the device; the host reads it.
    Input,
    /// Driven by the host.
    Output,
}

/// Logic level on a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}
