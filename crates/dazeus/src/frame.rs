//! Length-prefixed JSON framing.
//!
//! A frame is `<decimal length><body>`: ASCII digits giving the exact byte
//! length of a JSON object that follows immediately. CR and LF bytes around
//! the length are tolerated and skipped.
//!
//! ```text
//! 36{"get":"nick","params":["freenode"]}
//! ```

use thiserror::Error;

use crate::message::Message;

/// Result of scanning the front of a buffer for a frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Number of leading digit and CR/LF bytes making up the header.
    pub header_len: usize,
    /// Declared byte length of the JSON body.
    pub body_len: usize,
}

impl FrameHeader {
    /// Total bytes occupied by header and body.
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        self.header_len.saturating_add(self.body_len)
    }
}

/// Errors raised while encoding or decoding frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Data followed a header that declared no length.
    #[error("frame body starts with byte {byte:#04x} before any length digits")]
    MissingLength {
        /// First byte after the header.
        byte: u8,
    },
    /// The body was not a JSON object.
    #[error("failed to decode frame body: {0}")]
    Decode(#[source] serde_json::Error),
    /// The message could not be serialised.
    #[error("failed to encode frame body: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Scans the length header at the front of `buffer`.
///
/// Digits accumulate into the length and CR/LF bytes are skipped; scanning
/// stops at the first other byte. Overflowing lengths wrap rather than being
/// rejected.
#[must_use]
pub fn scan_header(buffer: &[u8]) -> FrameHeader {
    let mut header = FrameHeader {
        header_len: 0,
        body_len: 0,
    };
    for &byte in buffer {
        match byte {
            b'0'..=b'9' => {
                header.body_len = header
                    .body_len
                    .wrapping_mul(10)
                    .wrapping_add(usize::from(byte - b'0'));
            }
            b'\r' | b'\n' => {}
            _ => break,
        }
        header.header_len += 1;
    }
    header
}

/// Returns the header of the frame at the front of `buffer` once the whole
/// frame is available.
///
/// `None` means more bytes are needed: either no non-zero length has been
/// read yet or the body is still incomplete.
#[must_use]
pub fn try_parse_frame(buffer: &[u8]) -> Option<FrameHeader> {
    let header = scan_header(buffer);
    (header.body_len > 0 && buffer.len() >= header.frame_len()).then_some(header)
}

/// Serialises `message` and prefixes it with its byte length.
pub fn encode_frame(message: &Message) -> Result<Vec<u8>, FrameError> {
    let body = serde_json::to_vec(message).map_err(FrameError::Encode)?;
    let mut frame = body.len().to_string().into_bytes();
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decodes a frame body into a message.
pub fn decode_body(body: &[u8]) -> Result<Message, FrameError> {
    serde_json::from_slice(body).map_err(FrameError::Decode)
}
