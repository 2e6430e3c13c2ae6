//! Typed wrappers around the core's request vocabulary.
//!
//! Each wrapper builds one request, waits for a successful response through
//! [`DaZeus::request`] and extracts the field it needs. None of them hold
//! state of their own.

use std::io::{Read, Write};

use serde_json::Value;

use crate::client::DaZeus;
use crate::error::ClientError;
use crate::message::Message;
use crate::scope::Scope;

/// Which configuration tree a [`DaZeus::config`] lookup reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ConfigGroup {
    /// Settings for the calling plugin.
    Plugin,
    /// Settings of the core itself.
    Core,
}

impl<S: Read + Write> DaZeus<S> {
    /// Networks the core is connected to.
    pub fn networks(&mut self) -> Result<Vec<String>, ClientError> {
        self.request(&Message::query("networks"))?.strings("networks")
    }

    /// Channels the bot has joined on `network`.
    pub fn channels(&mut self, network: &str) -> Result<Vec<String>, ClientError> {
        self.request(&Message::query("channels").with_params([network]))?
            .strings("channels")
    }

    /// Joins `channel` on `network`.
    pub fn join(&mut self, network: &str, channel: &str) -> Result<(), ClientError> {
        self.perform("join", [network, channel])
    }

    /// Leaves `channel` on `network`.
    pub fn part(&mut self, network: &str, channel: &str) -> Result<(), ClientError> {
        self.perform("part", [network, channel])
    }

    /// Sends a regular message to `target`.
    pub fn message(&mut self, network: &str, target: &str, text: &str) -> Result<(), ClientError> {
        self.perform("message", [network, target, text])
    }

    /// Sends a CTCP action (`/me`) to `target`.
    pub fn action(&mut self, network: &str, target: &str, text: &str) -> Result<(), ClientError> {
        self.perform("action", [network, target, text])
    }

    /// Sends a notice to `target`.
    pub fn notice(&mut self, network: &str, target: &str, text: &str) -> Result<(), ClientError> {
        self.perform("notice", [network, target, text])
    }

    /// Sends a CTCP request to `target`.
    pub fn ctcp(&mut self, network: &str, target: &str, text: &str) -> Result<(), ClientError> {
        self.perform("ctcp", [network, target, text])
    }

    /// Sends a CTCP reply to `target`.
    pub fn ctcp_reply(&mut self, network: &str, target: &str, text: &str) -> Result<(), ClientError> {
        self.perform("ctcp_rep", [network, target, text])
    }

    /// The bot's nick on `network`.
    pub fn nick(&mut self, network: &str) -> Result<String, ClientError> {
        self.request(&Message::query("nick").with_params([network]))?
            .string("nick")
    }

    /// Reads configuration value `key` from `group`.
    pub fn config(&mut self, key: &str, group: ConfigGroup) -> Result<String, ClientError> {
        let group: &'static str = group.into();
        self.request(&Message::query("config").with_params([group, key]))?
            .string("value")
    }

    /// Reads a configuration value of the calling plugin.
    pub fn plugin_config(&mut self, key: &str) -> Result<String, ClientError> {
        self.config(key, ConfigGroup::Plugin)
    }

    /// Reads a configuration value of the core.
    pub fn core_config(&mut self, key: &str) -> Result<String, ClientError> {
        self.config(key, ConfigGroup::Core)
    }

    /// Prefix users put in front of bot commands.
    pub fn highlight_character(&mut self) -> Result<String, ClientError> {
        self.core_config("highlight")
    }

    /// Reads a property stored for `scope`.
    pub fn property(&mut self, name: &str, scope: &Scope) -> Result<String, ClientError> {
        self.request(&property_request(scope, ["get", name]))?
            .string("value")
    }

    /// Stores a property for `scope`.
    pub fn set_property(&mut self, name: &str, value: &str, scope: &Scope) -> Result<(), ClientError> {
        self.request(&property_request(scope, ["set", name, value]))
            .map(drop)
    }

    /// Removes a property from `scope`.
    pub fn unset_property(&mut self, name: &str, scope: &Scope) -> Result<(), ClientError> {
        self.request(&property_request(scope, ["unset", name]))
            .map(drop)
    }

    /// Property names starting with `prefix` within `scope`.
    pub fn property_keys(&mut self, prefix: &str, scope: &Scope) -> Result<Vec<String>, ClientError> {
        self.request(&property_request(scope, ["keys", prefix]))?
            .strings("keys")
    }

    /// Whether `permission` is granted within `scope`.
    ///
    /// `default` is what the core answers when nothing was stored.
    pub fn has_permission(
        &mut self,
        permission: &str,
        scope: &Scope,
        default: bool,
    ) -> Result<bool, ClientError> {
        let request = permission_request("check", scope, permission)?.with_params([
            Value::from("has"),
            Value::from(permission),
            Value::Bool(default),
        ]);
        self.request(&request)?.boolean("has_permission")
    }

    /// Grants or denies `permission` within `scope`.
    pub fn set_permission(
        &mut self,
        permission: &str,
        scope: &Scope,
        allow: bool,
    ) -> Result<(), ClientError> {
        let request = permission_request("set", scope, permission)?.with_params([
            Value::from("set"),
            Value::from(permission),
            Value::Bool(allow),
        ]);
        self.request(&request).map(drop)
    }

    /// Removes a stored permission from `scope`.
    pub fn unset_permission(&mut self, permission: &str, scope: &Scope) -> Result<(), ClientError> {
        let request =
            permission_request("unset", scope, permission)?.with_params(["unset", permission]);
        self.request(&request).map(drop)
    }

    /// Asks the network for WHOIS information; the answer arrives as a
    /// `WHOIS` event.
    pub fn whois(&mut self, network: &str, nick: &str) -> Result<(), ClientError> {
        self.perform("whois", [network, nick])
    }

    /// Asks the network who is in `channel`; the answer arrives as a `NAMES`
    /// event.
    pub fn names(&mut self, network: &str, channel: &str) -> Result<(), ClientError> {
        self.perform("names", [network, channel])
    }

    fn perform<const N: usize>(&mut self, operation: &str, params: [&str; N]) -> Result<(), ClientError> {
        self.request(&Message::action(operation).with_params(params))
            .map(drop)
    }
}

fn property_request<const N: usize>(scope: &Scope, params: [&str; N]) -> Message {
    let request = Message::action("property");
    let request = if scope.is_all() {
        request
    } else {
        request.with_scope(scope.to_property_slice())
    };
    request.with_params(params)
}

fn permission_request(
    action: &'static str,
    scope: &Scope,
    permission: &str,
) -> Result<Message, ClientError> {
    if scope.is_all() {
        return Err(ClientError::UniversalScope {
            action,
            permission: permission.to_owned(),
        });
    }
    Ok(Message::action("permission").with_scope(scope.to_property_slice()))
}
