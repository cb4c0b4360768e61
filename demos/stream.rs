//! Stream gesture samples from a Skywriter sensor to stdout.
//!
//! The sensor's wire format is not decoded by this crate, so this demo
//! installs a placeholder decoder that publishes a running frame count.
//! That is enough to watch the background poll thread and the sample
//! buffer end to end; swap in a real `FrameDecoder` to print positions.
//!
//! Usage: cargo run --example stream
//! Bus and pins come from SKYWRITER_I2C_BUS, SKYWRITER_RESET_PIN and
//! SKYWRITER_XFER_PIN (defaults: /dev/i2c-1, gpio 48, gpio 51).
//! Press Ctrl+C to stop.

use skywriter::{CancelToken, Device, Poller, Sample, SampleBuffer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

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

    let frames = Arc::new(AtomicU64::new(0));
    let decoder_frames = Arc::clone(&frames);
    device.set_decoder(move |_: &[u8]| {
        let n = decoder_frames.fetch_add(1, Ordering::Relaxed) + 1;
        Some(Sample::new(n as f64, 0.0, 0.0))
    });

    let token = CancelToken::new();
    let ctrlc_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || ctrlc_token.cancel()) {
        eprintln!("Failed to install Ctrl+C handler: {}", e);
        std::process::exit(1);
    }

    let buffer = Arc::new(SampleBuffer::new());
    let mut poller = Poller::new();
    poller.add(device, Arc::clone(&buffer));
    let handle = match poller.spawn(token.clone()) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Failed to start poll thread: {}", e);
            std::process::exit(1);
        }
    };

    println!("Streaming (Ctrl+C to stop)...");

    let start = Instant::now();
    let mut last_seen = 0u64;
    let mut last_report = Instant::now();

    while !token.is_cancelled() {
        // Consumer cadence: snapshot the latest sample at our own rate,
        // print only when it actually changed.
        let sample = buffer.snapshot();
        if sample.timestamp_us != last_seen {
            last_seen = sample.timestamp_us;
            println!("frame #{:<8} ts={}", sample.x as u64, sample.timestamp_us);
        }

        // Report rate every 3 seconds
        let now = Instant::now();
        if now.duration_since(last_report) >= Duration::from_secs(3) {
            let elapsed = start.elapsed().as_secs_f64();
            let count = frames.load(Ordering::Relaxed);
            println!(
                "--- {} frames in {:.1}s ({:.1} Hz) ---",
                count,
                elapsed,
                count as f64 / elapsed
            );
            last_report = now;
        }

        std::thread::sleep(Duration::from_millis(20));
    }

    handle.stop();

    let elapsed = start.elapsed().as_secs_f64();
    let count = frames.load(Ordering::Relaxed);
    println!(
        "\nTotal: {} frames in {:.1}s ({:.1} Hz)",
        count,
        elapsed,
        count as f64 / elapsed
    );
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
