use crate::types::Sample;
use std::time::Duration;

// -- Bus addressing --
/// Fixed 7-bit I2C address of the MGC3130.
pub const DEVICE_ADDR: u16 = 0x42;

// -- Registers --
/// Register the sensor serves sample blocks from.
pub const DATA_REGISTER: u8 = 0x00;
/// Register the "begin streaming" command is written to.
pub const CMD_REGISTER: u8 = 0xA1;

// -- Frame geometry --
/// Fixed length of one sensor data block.
pub const FRAME_LEN: u8 = 32;

/// Payload of the "begin streaming" command.
pub const START_STREAMING: [u8; 4] = [0x00, 0x1F, 0x00, 0x1F];

// -- Hardware timing --
/// Minimum reset pulse width.
pub const RESET_PULSE: Duration = Duration::from_millis(100);
/// Post-reset settle: datasheet minimum 200 ms, plus 100 ms of margin to
/// absorb scheduler jitter.
pub const RESET_SETTLE: Duration = Duration::from_millis(300);
/// Quiescent period after releasing the xfer line, before the next drain
/// may assert it again.
pub const XFER_COOLDOWN: Duration = Duration::from_micros(200);

/// Decodes one raw frame into at most one sample.
///
/// Frames that carry no position (headers, no-op frames, and in particular
/// the all-zero block) must yield `None`, never partial coordinates. A
/// produced sample is expected to be stamped with the decode wall-clock
/// time (`Sample::new` does this).
///
/// Any `FnMut(&[u8]) -> Option<Sample> + Send` closure qualifies.
pub trait FrameDecoder: Send {
    fn decode(&mut self, frame: &[u8]) -> Option<Sample>;
}

impl<F> FrameDecoder for F
where
    F: FnMut(&[u8]) -> Option<Sample> + Send,
{
    fn decode(&mut self, frame: &[u8]) -> Option<Sample> {
        self(frame)
    }
}

/// Stock decoder: logs every frame as hex at debug level and yields no
/// samples. The coordinate wire format is left to integrators; this makes
/// raw frames visible in the log until a real decoder is plugged in via
/// `Device::set_decoder`.
#[derive(Debug, Default)]
pub struct HexDumpDecoder;

impl FrameDecoder for HexDumpDecoder {
    fn decode(&mut self, frame: &[u8]) -> Option<Sample> {
        log::debug!("frame ({} bytes): {}", frame.len(), hex_frame(frame));
        None
    }
}

/// Space-separated uppercase hex rendering of a frame.
pub fn hex_frame(frame: &[u8]) -> String {
    frame
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_frame_format() {
        assert_eq!(hex_frame(&[0x00, 0x1F, 0xA1]), "00 1F A1");
        assert_eq!(hex_frame(&[]), "");
    }

    #[test]
    fn test_stock_decoder_yields_nothing() {
        let mut dec = HexDumpDecoder;
        assert!(dec.decode(&[0x91u8; 32]).is_none());
    }

    #[test]
    fn test_all_zero_frame_is_a_no_op() {
        let mut dec = HexDumpDecoder;
        assert!(dec.decode(&[0u8; 32]).is_none());
    }

    #[test]
    fn test_closure_decoder() {
        let mut dec = |frame: &[u8]| {
            if frame[0] == 0x91 {
                Some(Sample::new(1.0, 2.0, 3.0))
            } else {
                None
            }
        };
        assert!(dec.decode(&[0u8; 32]).is_none());
        let sample = dec.decode(&[0x91u8; 32]).unwrap();
        assert_eq!(sample.x, 1.0);
        assert_eq!(sample.y, 2.0);
        assert_eq!(sample.z, 3.0);
        assert!(sample.timestamp_us > 0);
    }
}
