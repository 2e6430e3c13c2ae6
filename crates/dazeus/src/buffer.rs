//! Accumulates raw bytes from the core until whole frames are available.

use std::io::{self, Read};

use crate::error::ClientError;
use crate::frame::{FrameError, decode_body, scan_header, try_parse_frame};
use crate::message::Message;

/// Bytes requested from the stream per read.
pub(crate) const READ_CHUNK: usize = 1024;

/// Receive-side buffer of one connection.
///
/// Reads are blocking and carry no timeout; deadlines belong to the socket.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Number of buffered bytes not yet consumed as frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no bytes are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends bytes received from the stream.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Drops all buffered bytes.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Consumes the next complete frame, if one is buffered.
    ///
    /// Exactly `header_len + body_len` bytes are removed from the front.
    pub fn next_frame(&mut self) -> Result<Option<Message>, FrameError> {
        let Some(header) = try_parse_frame(&self.bytes) else {
            return self.check_header().map(|()| None);
        };
        let frame: Vec<u8> = self.bytes.drain(..header.frame_len()).collect();
        let body = frame.get(header.header_len..).unwrap_or_default();
        decode_body(body).map(Some)
    }

    /// Blocks until a full frame is available and decodes it.
    pub fn read_frame<R: Read>(&mut self, reader: &mut R) -> Result<Message, ClientError> {
        loop {
            if let Some(message) = self.next_frame()? {
                return Ok(message);
            }
            self.fill(reader).map_err(ClientError::ReadResponse)?;
        }
    }

    fn fill<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut chunk = [0_u8; READ_CHUNK];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "core closed the connection",
                    ));
                }
                Ok(read) => {
                    self.extend(chunk.get(..read).unwrap_or_default());
                    return Ok(());
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error),
            }
        }
    }

    /// Rejects a body that starts before any length digit was seen.
    ///
    /// Without this the buffer would grow forever waiting for a frame whose
    /// length is zero.
    fn check_header(&self) -> Result<(), FrameError> {
        let header = scan_header(&self.bytes);
        match self.bytes.get(header.header_len) {
            Some(&byte) if header.body_len == 0 => Err(FrameError::MissingLength { byte }),
            _ => Ok(()),
        }
    }
}
