//! C FFI layer for skywriter.
//!
//! Provides an opaque handle-based API for C/C++ consumers.
//! The generated C header is written to `include/skywriter.h` by cbindgen.

use crate::device::Device;
use crate::error::LastError;
use std::ffi::{c_char, c_int, CStr};

/// Thread-safe last error message for C consumers.
static LAST_ERROR: LastError = LastError::new();

/// Opaque sensor session handle for C consumers.
pub struct SwDevice(Device);

/// Decoded sample in C-compatible layout.
#[repr(C)]
pub struct SwSample {
    /// Horizontal position, decoder-defined units.
    pub x: f64,
    /// Vertical position, decoder-defined units.
    pub y: f64,
    /// Distance from the sensing surface, decoder-defined units.
    pub z: f64,
    /// Host wall-clock timestamp in microseconds since the Unix epoch.
    pub timestamp_us: u64,
}

/// Open and initialize a sensor: GPIO export, reset pulse, settle wait,
/// bus binding and the streaming command. Blocks for at least 400 ms.
/// Returns NULL on error (check sw_last_error()).
///
/// # Safety
/// `bus_path` must be a valid null-terminated string, or null.
#[no_mangle]
pub unsafe extern "C" fn sw_open(
    bus_path: *const c_char,
    reset_pin: u32,
    xfer_pin: u32,
) -> *mut SwDevice {
    if bus_path.is_null() {
        return std::ptr::null_mut();
    }
    let bus_path = CStr::from_ptr(bus_path).to_string_lossy();

    match Device::open(&*bus_path, reset_pin as u64, xfer_pin as u64) {
        Ok(dev) => Box::into_raw(Box::new(SwDevice(dev))),
        Err(e) => {
            LAST_ERROR.set(&e);
            std::ptr::null_mut()
        }
    }
}

/// Run one transfer cycle and write any decoded sample into `sample`.
/// Returns 1 when a sample was written, 0 when the sensor had nothing
/// ready, -1 on error (check sw_last_error()).
///
/// # Safety
/// `dev` and `sample` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn sw_poll(dev: *mut SwDevice, sample: *mut SwSample) -> c_int {
    if dev.is_null() || sample.is_null() {
        return -1;
    }
    let dev = &mut *dev;

    match dev.0.poll_once() {
        Ok(Some(s)) => {
            sample.write(SwSample {
                x: s.x,
                y: s.y,
                z: s.z,
                timestamp_us: s.timestamp_us,
            });
            1
        }
        Ok(None) => 0,
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Shut a sensor session down and free its resources. Both GPIO lines
/// are floated and unexported best effort.
///
/// # Safety
/// `dev` must be a pointer returned by `sw_open`, or null.
#[no_mangle]
pub unsafe extern "C" fn sw_close(dev: *mut SwDevice) {
    if !dev.is_null() {
        drop(Box::from_raw(dev));
    }
}

/// Get the last error message. Returns NULL if no error.
/// The returned pointer is valid until the next skywriter API call.
#[no_mangle]
pub extern "C" fn sw_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}
