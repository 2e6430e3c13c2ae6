//! One connection to a core and the request/event correlation it needs.
//!
//! The protocol has no message identifiers. Responses are matched to
//! requests by arrival order and call nesting: while a request waits, the
//! core may push events whose handlers issue requests of their own, so the
//! waiting call can read responses that belong to a call further out.
//!
//! Two pieces of state resolve this. `call_depth` counts how many event
//! dispatches are currently running above the outermost blocking read, and
//! `pending` holds responses read out of turn, one slot per enclosing call:
//! slot `n` belongs to the call that was waiting at depth `n`. A response read
//! while `pending.len() == call_depth` belongs to the call doing the reading;
//! any other response is queued for an enclosing call, which claims its slot
//! once its dispatch returns and the queue is longer than the depth.
//!
//! A call whose event handling fails still reads until its own response
//! arrives and drops it before reporting the failure, so a later request on
//! the same connection finds the slots as they were before the call.
//!
//! This relies on the core answering requests in the order it received
//! them. Responses are only ever interleaved with events, never reordered
//! among themselves.
//!
//! A connection is single-threaded: it is not `Sync`, and handlers run on the
//! caller's stack.

use std::collections::VecDeque;
use std::fmt;
use std::io::{Read, Write};
use std::rc::Rc;

use dazeus_config::SocketEndpoint;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::buffer::FrameBuffer;
use crate::error::{ClientError, ProtocolError};
use crate::event::{Event, EventKind};
use crate::frame::encode_frame;
use crate::message::Message;
use crate::registry::{ListenerHandle, Registry};
use crate::scope::Scope;
use crate::transport::{self, Stream};

/// Callback invoked for a matching event.
///
/// Handlers receive the connection so they can issue requests, subscribe or
/// unsubscribe while an outer request is still waiting. An error returned
/// here aborts dispatch and propagates out of the call that read the event.
pub type Handler<S> = Rc<dyn Fn(&mut DaZeus<S>, &Event) -> Result<(), ClientError>>;

/// A connection to a DaZeus core.
pub struct DaZeus<S = Stream> {
    stream: S,
    buffer: FrameBuffer,
    registry: Registry<Handler<S>>,
    call_depth: usize,
    pending: VecDeque<Message>,
}

impl DaZeus<Stream> {
    /// Connects to the core at `endpoint`.
    pub fn connect(endpoint: &SocketEndpoint) -> Result<Self, ClientError> {
        let stream = transport::connect(endpoint)?;
        debug!(%endpoint, "connected to core");
        Ok(Self::new(stream))
    }

    /// Connects using a connection string such as `tcp:localhost:1234` or
    /// `unix:/run/dazeus/dazeus.sock`.
    pub fn connect_str(connection: &str) -> Result<Self, ClientError> {
        let endpoint: SocketEndpoint = connection.parse()?;
        Self::connect(&endpoint)
    }

    /// Closes the socket.
    pub fn close(self) -> Result<(), ClientError> {
        self.into_inner()
            .shutdown()
            .map_err(ClientError::SendRequest)
    }
}

impl<S> DaZeus<S> {
    /// Wraps an already connected stream.
    #[must_use]
    pub const fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: FrameBuffer::new(),
            registry: Registry::new(),
            call_depth: 0,
            pending: VecDeque::new(),
        }
    }

    /// Drops all connection state and returns the stream.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Borrows the underlying stream.
    #[must_use]
    pub const fn stream(&self) -> &S {
        &self.stream
    }

    /// Mutably borrows the underlying stream.
    #[must_use]
    pub const fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Number of event dispatches currently running on this connection.
    #[must_use]
    pub const fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Number of responses read out of turn and not yet claimed.
    #[must_use]
    pub fn pending_responses(&self) -> usize {
        self.pending.len()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }
}

impl<S: Read + Write> DaZeus<S> {
    /// Sends `request` and blocks until its response arrives.
    ///
    /// Events read in the meantime are dispatched to their handlers first.
    /// If a handler fails, or an event cannot be decoded, the first such
    /// error is returned from here once the response has been read and
    /// discarded. The response is handed back as-is, without checking
    /// `success`.
    pub fn send_and_await(&mut self, request: &Message) -> Result<Message, ClientError> {
        self.write_message(request)?;
        self.await_response()
    }

    /// Sends `request` and returns its response if the core reports success.
    ///
    /// A response without a boolean `success` field is a protocol violation;
    /// `success: false` is an [`ClientError::OperationFailed`].
    pub fn request(&mut self, request: &Message) -> Result<Message, ClientError> {
        let response = self.send_and_await(request)?;
        expect_success(request.operation(), response)
    }

    /// Dispatches events forever.
    ///
    /// Returns only with an error, for example when the core closes the
    /// connection or sends a response nobody asked for.
    pub fn listen(&mut self) -> Result<(), ClientError> {
        loop {
            self.listen_once()?;
        }
    }

    /// Reads and dispatches exactly one event.
    pub fn listen_once(&mut self) -> Result<(), ClientError> {
        let message = self.read_message()?;
        if !message.is_event() {
            return Err(ProtocolError::UnexpectedResponse.into());
        }
        let event = Event::from_message(&message)?;
        self.dispatch(&event)
    }

    /// Registers `handler` for events of `kind`.
    ///
    /// The first listener for a kind asks the core to start forwarding it;
    /// if the core refuses, nothing is registered. `COMMAND` events are
    /// subscribed per name with [`DaZeus::subscribe_command`].
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> Result<ListenerHandle, ClientError>
    where
        F: Fn(&mut Self, &Event) -> Result<(), ClientError> + 'static,
    {
        if kind.is_command() {
            return Err(ClientError::CommandNeedsName);
        }
        if !self.registry.has_kind(kind) {
            debug!(event = %kind, "requesting core subscription");
            self.request(&Message::action("subscribe").with_params([kind.as_str()]))?;
        }
        let handle = self.registry.register(kind, None, Rc::new(handler));
        debug!(event = %kind, %handle, "registered event listener");
        Ok(handle)
    }

    /// Registers `handler` for the bot command `command` within `scope`.
    ///
    /// The scope is validated before anything is sent. Every command
    /// subscription is announced to the core.
    pub fn subscribe_command<F>(
        &mut self,
        command: &str,
        scope: &Scope,
        handler: F,
    ) -> Result<ListenerHandle, ClientError>
    where
        F: Fn(&mut Self, &Event) -> Result<(), ClientError> + 'static,
    {
        let mut params = vec![Value::from(command)];
        params.extend(scope.to_command_slice()?);
        debug!(command, "requesting core subscription for command");
        self.request(&Message::action("command").with_params(params))?;
        let handle = self
            .registry
            .register(EventKind::Command, Some(command.to_owned()), Rc::new(handler));
        debug!(command, %handle, "registered command listener");
        Ok(handle)
    }

    /// Removes a listener.
    ///
    /// When the last listener of a non-command kind goes away the core is
    /// told to stop forwarding that kind. The listener stays removed even if
    /// that request fails.
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> Result<(), ClientError> {
        let filter = self.registry.unregister(handle)?;
        if filter.kind.is_command() {
            debug!(command = ?filter.command, %handle, "removed command listener");
            return Ok(());
        }

        debug!(event = %filter.kind, %handle, "removed event listener");
        if self.registry.has_kind(filter.kind) {
            return Ok(());
        }
        debug!(event = %filter.kind, "cancelling core subscription");
        self.request(&Message::action("unsubscribe").with_params([filter.kind.as_str()]))?;
        Ok(())
    }

    fn await_response(&mut self) -> Result<Message, ClientError> {
        let mut failure = None;
        loop {
            let message = self.read_message()?;
            if message.is_event() {
                if let Err(error) = self.handle_nested_event(&message) {
                    if failure.is_none() {
                        debug!(
                            depth = self.call_depth,
                            %error,
                            "event handling failed, draining response before reporting"
                        );
                        failure = Some(error);
                    } else {
                        warn!(depth = self.call_depth, %error, "event handling failed again");
                    }
                }

                if let Some(response) = self.pending.remove(self.call_depth) {
                    trace!(depth = self.call_depth, "claimed queued response");
                    return settle(response, failure);
                }
            } else if self.pending.len() == self.call_depth {
                return settle(message, failure);
            } else {
                trace!(
                    depth = self.call_depth,
                    queued = self.pending.len(),
                    "queueing response for an enclosing call"
                );
                self.pending.push_back(message);
            }
        }
    }

    fn handle_nested_event(&mut self, message: &Message) -> Result<(), ClientError> {
        let event = Event::from_message(message)?;
        self.call_depth += 1;
        let dispatched = self.dispatch(&event);
        self.call_depth -= 1;
        dispatched
    }

    /// Invokes matching handlers in registration order.
    ///
    /// Matches are taken before the first handler runs; a listener removed by
    /// an earlier handler is skipped.
    fn dispatch(&mut self, event: &Event) -> Result<(), ClientError> {
        for (handle, handler) in self.registry.matching(event) {
            if !self.registry.contains(handle) {
                continue;
            }
            debug!(event = %event.kind, %handle, "calling matching event handler");
            handler(self, event)?;
        }
        Ok(())
    }

    fn read_message(&mut self) -> Result<Message, ClientError> {
        let message = self.buffer.read_frame(&mut self.stream)?;
        debug!(
            operation = message.operation(),
            depth = self.call_depth,
            "received message from core"
        );
        Ok(message)
    }

    fn write_message(&mut self, message: &Message) -> Result<(), ClientError> {
        let frame = encode_frame(message)?;
        debug!(
            operation = message.operation(),
            bytes = frame.len(),
            depth = self.call_depth,
            "sending message to core"
        );
        self.stream
            .write_all(&frame)
            .map_err(ClientError::SendRequest)?;
        self.stream.flush().map_err(ClientError::SendRequest)
    }
}

impl<S> fmt::Debug for DaZeus<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DaZeus")
            .field("buffered_bytes", &self.buffer.len())
            .field("listeners", &self.registry)
            .field("call_depth", &self.call_depth)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

fn settle(response: Message, failure: Option<ClientError>) -> Result<Message, ClientError> {
    failure.map_or(Ok(response), Err)
}

/// Validates the `success` field of a response.
pub fn expect_success(operation: &str, response: Message) -> Result<Message, ClientError> {
    match response.get("success") {
        None => Err(ProtocolError::MissingSuccess.into()),
        Some(Value::Bool(true)) => Ok(response),
        Some(Value::Bool(false)) => Err(ClientError::OperationFailed {
            operation: operation.to_owned(),
        }),
        Some(_) => Err(ProtocolError::NonBooleanSuccess.into()),
    }
}
