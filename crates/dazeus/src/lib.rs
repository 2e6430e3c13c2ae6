//! Client for the DaZeus IRC bot core.
//!
//! Plugins talk to a core over a stream socket using length-prefixed JSON
//! frames. Requests are answered in order, but the core interleaves push
//! events with those answers; [`DaZeus`] untangles the two, dispatching
//! events to registered handlers while a request is waiting and routing each
//! response to the call it belongs to.
//!
//! ```no_run
//! use dazeus::{DaZeus, EventKind, Scope};
//!
//! # fn main() -> Result<(), dazeus::ClientError> {
//! let mut bot = DaZeus::connect_str("tcp:localhost:1234")?;
//! bot.subscribe_command("ping", &Scope::all(), |bot, event| {
//!     event.reply(bot, "pong", true)
//! })?;
//! bot.subscribe(EventKind::Join, |bot, event| {
//!     bot.message(&event.network, &event.channel, &format!("hello {}", event.sender))
//! })?;
//! bot.listen()
//! # }
//! ```
//!
//! A connection must only ever be used from one thread. Handlers run on the
//! stack of whichever call read their event and may issue requests of their
//! own. Nothing here times out: a core that stops answering blocks the caller
//! until the socket reports an error.

mod buffer;
mod client;
mod commands;
mod error;
mod event;
mod frame;
mod message;
mod registry;
mod reply;
mod scope;
pub mod telemetry;
mod transport;

pub use buffer::FrameBuffer;
pub use client::{DaZeus, Handler, expect_success};
pub use commands::ConfigGroup;
pub use dazeus_config::SocketEndpoint;
pub use error::{ClientError, ProtocolError};
pub use event::{Event, EventKind};
pub use frame::{FrameError, FrameHeader, decode_body, encode_frame, scan_header, try_parse_frame};
pub use message::{Message, string_array};
pub use registry::{ListenerFilter, ListenerHandle, Registry, RegistryError};
pub use reply::ReplyKind;
pub use scope::{Scope, ScopeError};
pub use transport::{CONNECTION_TIMEOUT, Stream, connect};

#[cfg(test)]
mod tests;
