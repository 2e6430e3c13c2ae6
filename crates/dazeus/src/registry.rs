//! Listener bookkeeping for one connection.
//!
//! The registry only stores and matches listeners. Telling the core to start
//! or stop forwarding an event kind, and invoking handlers, is done by the
//! connection so that handlers can issue requests of their own.

use std::fmt;

use thiserror::Error;

use crate::event::{Event, EventKind};

/// Identifies a registered listener.
///
/// Handles start at 1, increase monotonically and are never reused on the
/// same connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    /// Numeric value of the handle.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Errors raised by the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No listener is registered under the handle.
    #[error("no listener registered for handle {0}")]
    NotFound(ListenerHandle),
}

/// What a listener is interested in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFilter {
    /// Event kind to match.
    pub kind: EventKind,
    /// Command name; only consulted for `COMMAND` listeners.
    pub command: Option<String>,
}

impl ListenerFilter {
    fn matches(&self, event: &Event) -> bool {
        self.kind == event.kind && (!self.kind.is_command() || self.command == event.command)
    }
}

/// Registered listeners in registration order.
pub struct Registry<H> {
    listeners: Vec<(ListenerHandle, ListenerFilter, H)>,
    last_handle: u64,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for Registry<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(
                self.listeners
                    .iter()
                    .map(|(handle, filter, _)| (handle, filter)),
            )
            .finish()
    }
}

impl<H> Registry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
            last_handle: 0,
        }
    }

    /// Stores a listener and returns its freshly allocated handle.
    pub fn register(&mut self, kind: EventKind, command: Option<String>, handler: H) -> ListenerHandle {
        self.last_handle += 1;
        let handle = ListenerHandle(self.last_handle);
        self.listeners
            .push((handle, ListenerFilter { kind, command }, handler));
        handle
    }

    /// Removes a listener, returning what it listened for.
    pub fn unregister(&mut self, handle: ListenerHandle) -> Result<ListenerFilter, RegistryError> {
        let position = self
            .listeners
            .iter()
            .position(|(candidate, _, _)| *candidate == handle)
            .ok_or(RegistryError::NotFound(handle))?;
        let (_, filter, _) = self.listeners.remove(position);
        Ok(filter)
    }

    /// Whether `handle` is currently registered.
    #[must_use]
    pub fn contains(&self, handle: ListenerHandle) -> bool {
        self.listeners.iter().any(|(candidate, _, _)| *candidate == handle)
    }

    /// Whether any listener is registered for `kind`.
    #[must_use]
    pub fn has_kind(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|(_, filter, _)| filter.kind == kind)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<H: Clone> Registry<H> {
    /// Listeners matching `event`, in registration order.
    ///
    /// Handlers are cloned out so the caller can invoke them while the
    /// registry is mutated by those same handlers.
    #[must_use]
    pub fn matching(&self, event: &Event) -> Vec<(ListenerHandle, H)> {
        self.listeners
            .iter()
            .filter(|(_, filter, _)| filter.matches(event))
            .map(|(handle, _, handler)| (*handle, handler.clone()))
            .collect()
    }
}
