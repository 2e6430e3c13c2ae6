//! A scripted core listening on an ephemeral TCP port.

use std::io::{self, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, ensure};
use serde_json::Value;

use super::encoded;
use crate::{FrameBuffer, SocketEndpoint};

/// One step of a core script.
#[derive(Debug, Clone)]
pub(in crate::tests) enum CoreStep {
    /// Read one request and check it equals the value.
    Expect(Value),
    /// Write one frame.
    Send(Value),
}

/// A core that accepts one client and plays a script against it.
pub(in crate::tests) struct FakeCore {
    port: u16,
    requests: Arc<Mutex<Vec<Value>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeCore {
    /// Starts listening; the script runs once a client connects.
    pub fn spawn(script: Vec<CoreStep>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake core")?;
        listener
            .set_nonblocking(true)
            .context("fake core nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let requests_clone = Arc::clone(&requests);
        let handle = thread::spawn(move || Self::serve_client(&listener, &script, &requests_clone));
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    /// Endpoint clients should dial.
    pub fn endpoint(&self) -> SocketEndpoint {
        SocketEndpoint::tcp("127.0.0.1", self.port)
    }

    /// Waits for the script to finish and returns the requests it read.
    pub fn finish(mut self) -> Result<Vec<Value>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake core thread panicked"))?
                .context("fake core script failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        script: &[CoreStep],
        requests: &Mutex<Vec<Value>>,
    ) -> Result<()> {
        let stream = Self::accept(listener)?;
        stream
            .set_nonblocking(false)
            .context("fake core blocking stream")?;
        Self::play(stream, script, requests)
    }

    fn accept(listener: &TcpListener) -> Result<TcpStream> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => return Ok(stream),
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(error) => return Err(error).context("accept client"),
            }
        }
    }

    fn play(mut stream: TcpStream, script: &[CoreStep], requests: &Mutex<Vec<Value>>) -> Result<()> {
        let mut buffer = FrameBuffer::new();
        for step in script {
            match step {
                CoreStep::Expect(expected) => {
                    let request = buffer.read_frame(&mut stream).context("read request")?;
                    let request = serde_json::to_value(request).context("request to json")?;
                    requests
                        .lock()
                        .map_err(|error| anyhow!("lock requests: {error}"))?
                        .push(request.clone());
                    ensure!(
                        &request == expected,
                        "unexpected request: expected {expected}, got {request}"
                    );
                }
                CoreStep::Send(frame) => {
                    stream
                        .write_all(&encoded(frame.clone()))
                        .context("write frame")?;
                    stream.flush().context("flush frame")?;
                }
            }
        }
        Ok(())
    }
}

impl Drop for FakeCore {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
