//! Push events sent by the core.
//!
//! Event parameters are positional. The first three are, when present, the
//! network, the sender and the channel (receiver); a `COMMAND` event then
//! carries the command name; whatever remains is kind specific payload.

use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::ProtocolError;
use crate::message::{Message, string_array};

/// The closed set of event kinds a core can push.
///
/// Wire names are upper case (`PRIVMSG`, `CTCP_REP`, `PRIVMSG_ME`, ...) and
/// parse case-insensitively.
///
/// | Kind                                                         | Minimum parameters            |
/// |--------------------------------------------------------------|-------------------------------|
/// | `COMMAND`                                                    | network, sender, channel, name |
/// | `PRIVMSG`, `NOTICE`, `CTCP`, `CTCP_REP`, `ACTION`, `*_ME`    | network, sender, channel      |
/// | `JOIN`, `PART`, `KICK`                                       | network, sender, channel      |
/// | `QUIT`, `NICK`                                               | network, sender               |
/// | everything else                                              | network                       |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EventKind {
    /// The core connected to a network.
    Connect,
    /// The core disconnected from a network.
    Disconnect,
    /// Someone joined a channel.
    Join,
    /// Someone left a channel.
    Part,
    /// Someone quit the network.
    Quit,
    /// Someone changed nick.
    Nick,
    /// A mode changed.
    Mode,
    /// A channel topic was reported or changed.
    Topic,
    /// The bot was invited somewhere.
    Invite,
    /// Someone was kicked.
    Kick,
    /// A regular message.
    Privmsg,
    /// A notice.
    Notice,
    /// A CTCP request.
    Ctcp,
    /// A CTCP reply.
    #[strum(to_string = "CTCP_REP")]
    CtcpReply,
    /// A CTCP action (`/me`).
    Action,
    /// A numeric server reply.
    Numeric,
    /// A server message the core did not recognise.
    Unknown,
    /// A WHOIS reply.
    Whois,
    /// A NAMES reply.
    Names,
    /// A message sent by the bot itself.
    #[strum(to_string = "PRIVMSG_ME")]
    SelfPrivmsg,
    /// A CTCP request sent by the bot itself.
    #[strum(to_string = "CTCP_ME")]
    SelfCtcp,
    /// An action sent by the bot itself.
    #[strum(to_string = "ACTION_ME")]
    SelfAction,
    /// A PONG reply.
    Pong,
    /// A bot command addressed to a subscribed command name.
    Command,
}

impl EventKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether this is the synthetic `COMMAND` kind.
    #[must_use]
    pub const fn is_command(self) -> bool {
        matches!(self, Self::Command)
    }

    /// Smallest number of parameters a well-formed event of this kind has.
    #[must_use]
    pub const fn min_params(self) -> usize {
        match self {
            Self::Command => 4,
            Self::Privmsg
            | Self::Notice
            | Self::Ctcp
            | Self::CtcpReply
            | Self::Action
            | Self::SelfPrivmsg
            | Self::SelfCtcp
            | Self::SelfAction
            | Self::Join
            | Self::Part
            | Self::Kick => 3,
            Self::Quit | Self::Nick => 2,
            Self::Connect
            | Self::Disconnect
            | Self::Mode
            | Self::Topic
            | Self::Invite
            | Self::Numeric
            | Self::Unknown
            | Self::Whois
            | Self::Names
            | Self::Pong => 1,
        }
    }
}

/// A decoded push event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Kind of the event.
    pub kind: EventKind,
    /// Network the event happened on.
    pub network: String,
    /// Originator, empty when the core sent none.
    pub sender: String,
    /// Channel or receiver, empty when the core sent none.
    pub channel: String,
    /// Command name, only set for `COMMAND` events.
    pub command: Option<String>,
    /// Remaining kind specific parameters.
    pub params: Vec<String>,
}

impl Event {
    /// Decodes an event frame, enforcing the per-kind parameter arity.
    pub fn from_message(message: &Message) -> Result<Self, ProtocolError> {
        let name = message
            .get("event")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingEventType)?;
        let kind: EventKind = name
            .parse()
            .map_err(|_| ProtocolError::UnknownEvent(name.to_owned()))?;
        let params = message
            .get("params")
            .and_then(string_array)
            .ok_or(ProtocolError::MalformedParams)?;
        if params.len() < kind.min_params() {
            return Err(ProtocolError::TooFewParams {
                kind,
                expected: kind.min_params(),
                found: params.len(),
            });
        }

        let mut params = params.into_iter();
        let network = params.next().unwrap_or_default();
        let sender = params.next().unwrap_or_default();
        let channel = params.next().unwrap_or_default();
        let command = if kind.is_command() {
            params.next()
        } else {
            None
        };

        Ok(Self {
            kind,
            network,
            sender,
            channel,
            command,
            params: params.collect(),
        })
    }
}
