//! Error types surfaced by the client.
//!
//! Nothing here is retried internally. Failures raised inside an event
//! handler unwind through the request that was waiting when the event
//! arrived, so even a simple-looking call can report an error that originated
//! several handler levels deep.

use std::io;

use thiserror::Error;

use crate::event::EventKind;
use crate::frame::FrameError;
use crate::registry::RegistryError;
use crate::scope::ScopeError;

/// Errors raised by a [`DaZeus`](crate::DaZeus) connection.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The core address could not be resolved.
    #[error("failed to resolve core address {endpoint}: {source}")]
    Resolve {
        /// Endpoint as configured.
        endpoint: String,
        /// Underlying resolver failure.
        #[source]
        source: io::Error,
    },
    /// Dialling the core failed.
    #[error("failed to connect to core at {endpoint}: {source}")]
    Connect {
        /// Endpoint as configured.
        endpoint: String,
        /// Underlying socket failure.
        #[source]
        source: io::Error,
    },
    /// The connection string could not be parsed.
    #[error("invalid connection string: {0}")]
    ConnectionString(#[from] dazeus_config::SocketParseError),
    /// Unix sockets are unavailable on this platform.
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {0}")]
    UnsupportedUnixTransport(String),
    /// A frame could not be encoded or decoded. Fatal to the connection.
    #[error(transparent)]
    Framing(#[from] FrameError),
    /// Writing a request to the core failed.
    #[error("failed to send request to core: {0}")]
    SendRequest(#[source] io::Error),
    /// Reading from the core failed, including the core closing the stream.
    #[error("failed to read from core: {0}")]
    ReadResponse(#[source] io::Error),
    /// The core sent something the protocol does not allow at this point.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// The core answered `success: false`.
    #[error("core reported failure for '{operation}'")]
    OperationFailed {
        /// The `do`/`get` operation that failed.
        operation: String,
    },
    /// A listener handle could not be resolved.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A scope could not be encoded for the request.
    #[error(transparent)]
    Scope(#[from] ScopeError),
    /// `COMMAND` events are subscribed per command name.
    #[error("COMMAND events must be subscribed with subscribe_command")]
    CommandNeedsName,
    /// A permission call was made with the universal scope.
    #[error("refusing to {action} permission '{permission}' for the universal scope")]
    UniversalScope {
        /// `check`, `set` or `unset`.
        action: &'static str,
        /// Permission name.
        permission: String,
    },
    /// A successful response lacked a field the caller needs.
    #[error("response to '{operation}' has no '{field}' field")]
    MissingField {
        /// Operation whose response was inspected.
        operation: String,
        /// Field that was expected.
        field: &'static str,
    },
    /// A response field had the wrong JSON type.
    #[error("response field '{field}' is not {expected}")]
    InvalidField {
        /// Field that was inspected.
        field: &'static str,
        /// Human readable description of the expected type.
        expected: &'static str,
    },
}

/// Protocol violations committed by the core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A response arrived while only events were expected.
    #[error("unexpected non-event message while listening for events")]
    UnexpectedResponse,
    /// A response carried no `success` field.
    #[error("response has no success field")]
    MissingSuccess,
    /// The `success` field was not a boolean.
    #[error("response success field is not a boolean")]
    NonBooleanSuccess,
    /// An event frame carried no string `event` field.
    #[error("event message has no event type")]
    MissingEventType,
    /// The event type is outside the known set.
    #[error("unknown event type '{0}'")]
    UnknownEvent(String),
    /// Event parameters were absent or not all strings.
    #[error("event parameters must be an array of strings")]
    MalformedParams,
    /// Fewer parameters than the event kind requires.
    #[error("{kind} event needs at least {expected} parameters, got {found}")]
    TooFewParams {
        /// Kind of the offending event.
        kind: EventKind,
        /// Minimum arity of the kind.
        expected: usize,
        /// Number of parameters received.
        found: usize,
    },
}
