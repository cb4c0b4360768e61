use std::fmt;

/// Errors that can occur when driving the gesture sensor.
#[derive(Debug, thiserror::Error)]
pub enum SkywriterError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] sysfs_gpio::Error),

    #[error("I2C error: {0}")]
    Bus(#[from] i2cdev::linux::LinuxI2CError),

    // Reserved for decoders that reject malformed frames; the stock decoder
    // returns "no sample" instead of failing.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("poll thread error: {0}")]
    Thread(String),
}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &SkywriterError) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = fmt::format(format_args!("{}\0", err));
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}
