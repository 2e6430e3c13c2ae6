//! Test doubles standing in for a core.
//!
//! [`ScriptedStream`] is preloaded with every frame the core will send and
//! records what the client writes, which is enough for deterministic
//! correlation tests because the client never waits on the core's timing.
//! [`FakeCore`] runs the same kind of script over a real TCP socket.

mod fake_core;

use std::io::{self, Cursor, Read, Write};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{DaZeus, FrameBuffer, Message, encode_frame};

pub(in crate::tests) use fake_core::{CoreStep, FakeCore};

/// In-memory stream that replays canned core frames.
#[derive(Debug, Default)]
pub(in crate::tests) struct ScriptedStream {
    incoming: Cursor<Vec<u8>>,
    written: Vec<u8>,
}

impl ScriptedStream {
    /// Queues `frames` for the client to read, in order.
    pub fn new(frames: impl IntoIterator<Item = Value>) -> Self {
        let mut incoming = Vec::new();
        for frame in frames {
            incoming.extend(encoded(frame));
        }
        Self {
            incoming: Cursor::new(incoming),
            written: Vec::new(),
        }
    }

    /// Requests the client wrote so far, decoded.
    pub fn sent(&self) -> Result<Vec<Value>> {
        let mut buffer = FrameBuffer::new();
        buffer.extend(&self.written);
        let mut requests = Vec::new();
        while let Some(message) = buffer.next_frame().context("decode written frame")? {
            requests.push(serde_json::to_value(message).context("request to json")?);
        }
        anyhow::ensure!(buffer.is_empty(), "trailing partial frame in written bytes");
        Ok(requests)
    }

    /// Whether every scripted byte was consumed.
    pub fn exhausted(&self) -> bool {
        usize::try_from(self.incoming.position()).ok() == Some(self.incoming.get_ref().len())
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.incoming.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A client reading `frames` from a scripted core.
pub(in crate::tests) fn scripted_client(
    frames: impl IntoIterator<Item = Value>,
) -> DaZeus<ScriptedStream> {
    DaZeus::new(ScriptedStream::new(frames))
}

/// Requests written by a scripted client.
pub(in crate::tests) fn sent(client: &DaZeus<ScriptedStream>) -> Result<Vec<Value>> {
    client.stream().sent()
}

/// Encodes a JSON object as a wire frame.
pub(in crate::tests) fn encoded(value: Value) -> Vec<u8> {
    let message: Message = serde_json::from_value(value).expect("frame must be a JSON object");
    encode_frame(&message).expect("encode frame")
}

/// `{"success": true}` merged with `fields`.
pub(in crate::tests) fn ok(fields: Value) -> Value {
    let mut response = serde_json::json!({"success": true});
    if let (Some(target), Value::Object(extra)) = (response.as_object_mut(), fields) {
        target.extend(extra);
    }
    response
}

/// A push event frame.
pub(in crate::tests) fn event(kind: &str, params: &[&str]) -> Value {
    serde_json::json!({"event": kind, "params": params})
}
