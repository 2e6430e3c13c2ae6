//! Network/receiver/sender scopes for properties, permissions and command
//! subscriptions.

use serde_json::Value;
use thiserror::Error;

/// A restriction to a network and, optionally, a receiver or sender on it.
///
/// The empty scope is universal: it applies to every network, receiver and
/// sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Network the scope is restricted to.
    pub network: Option<String>,
    /// Receiver (usually a channel) the scope is restricted to.
    pub receiver: Option<String>,
    /// Sender (usually a nick) the scope is restricted to.
    pub sender: Option<String>,
}

/// Errors raised while encoding a scope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    /// Command subscriptions restrict to a receiver or a sender, not both.
    #[error("a command scope cannot restrict both receiver and sender")]
    ReceiverAndSender,
}

impl Scope {
    /// The universal scope.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            network: None,
            receiver: None,
            sender: None,
        }
    }

    /// A scope covering one network.
    #[must_use]
    pub fn network(network: impl Into<String>) -> Self {
        Self {
            network: Some(network.into()),
            ..Self::all()
        }
    }

    /// Restricts the scope to a receiver.
    #[must_use]
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    /// Restricts the scope to a sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Whether the scope applies everywhere.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.network.is_none() && self.receiver.is_none() && self.sender.is_none()
    }

    /// Encodes the scope for property and permission requests.
    ///
    /// Each level is only emitted when every enclosing level is set: network,
    /// then receiver, then sender.
    #[must_use]
    pub fn to_property_slice(&self) -> Vec<String> {
        let levels = [&self.network, &self.receiver, &self.sender];
        levels
            .into_iter()
            .map_while(Option::clone)
            .collect()
    }

    /// Encodes the scope for a command subscription.
    ///
    /// The network comes first; a receiver restriction follows as
    /// `true, receiver` and a sender restriction as `false, sender`. Neither
    /// is emitted without a network. Older clients send `false` before a
    /// receiver too, so a core relying on that flag sees a difference.
    pub fn to_command_slice(&self) -> Result<Vec<Value>, ScopeError> {
        if self.receiver.is_some() && self.sender.is_some() {
            return Err(ScopeError::ReceiverAndSender);
        }

        let Some(network) = &self.network else {
            return Ok(Vec::new());
        };
        let mut slice = vec![Value::from(network.as_str())];
        if let Some(receiver) = &self.receiver {
            slice.extend([Value::Bool(true), Value::from(receiver.as_str())]);
        }
        if let Some(sender) = &self.sender {
            slice.extend([Value::Bool(false), Value::from(sender.as_str())]);
        }
        Ok(slice)
    }
}
