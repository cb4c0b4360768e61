//! Dump raw sensor frames as hex, polling on the main thread.
//!
//! Usage: cargo run --example hexdump
//! Bus and pins come from SKYWRITER_I2C_BUS, SKYWRITER_RESET_PIN and
//! SKYWRITER_XFER_PIN (defaults: /dev/i2c-1, gpio 48, gpio 51).
//! Press Ctrl+C to stop.

use skywriter::{hex_frame, CancelToken, Device};
use std::time::Duration;

fn main() {
    env_logger::init();

    let bus = std::env::var("SKYWRITER_I2C_BUS").unwrap_or_else(|_| "/dev/i2c-1".into());
    let reset_pin = pin_from_env("SKYWRITER_RESET_PIN", 48);
    let xfer_pin = pin_from_env("SKYWRITER_XFER_PIN", 51);

    println!(
        "Opening sensor on {} (reset gpio{}, xfer gpio{})...",
        bus, reset_pin, xfer_pin
    );
    let mut device = match Device::open(&bus, reset_pin, xfer_pin) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to open sensor: {}", e);
            std::process::exit(1);
        }
    };

    device.set_decoder(|frame: &[u8]| {
        println!("{}", hex_frame(frame));
        None
    });

    let token = CancelToken::new();
    let ctrlc_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || ctrlc_token.cancel()) {
        eprintln!("Failed to install Ctrl+C handler: {}", e);
        std::process::exit(1);
    }

    println!("Dumping frames (Ctrl+C to stop)...");

    while !token.is_cancelled() {
        if let Err(e) = device.poll_once() {
            eprintln!("poll error: {}", e);
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    device.close();
    println!("closed");
}

fn pin_from_env(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(v) => match v.parse() {
            Ok(pin) => pin,
            Err(_) => {
                eprintln!("{} must be a GPIO pin number, got {:?}", name, v);
                std::process::exit(1);
            }
        },
        Err(_) => default,
    }
}
