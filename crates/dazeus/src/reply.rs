//! Answering whoever triggered an event.
//!
//! An event addressed to the bot's own nick is a private message, so the
//! answer goes back to the sender. Anything else is answered in the channel
//! it came from.

use std::io::{Read, Write};

use crate::client::DaZeus;
use crate::error::ClientError;
use crate::event::Event;

/// How a reply is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// A regular message.
    Message,
    /// A notice.
    Notice,
    /// A CTCP action.
    Action,
    /// A CTCP reply.
    CtcpReply,
}

impl ReplyKind {
    const fn supports_highlight(self) -> bool {
        matches!(self, Self::Message | Self::Notice)
    }
}

impl<S: Read + Write> DaZeus<S> {
    /// Replies to `sender` with a message.
    ///
    /// With `highlight` set, an in-channel reply is prefixed with
    /// `"<sender>: "`.
    pub fn reply(
        &mut self,
        network: &str,
        channel: &str,
        sender: &str,
        text: &str,
        highlight: bool,
    ) -> Result<(), ClientError> {
        self.send_reply(ReplyKind::Message, network, channel, sender, text, highlight)
    }

    /// Replies to `sender` with a notice.
    pub fn reply_notice(
        &mut self,
        network: &str,
        channel: &str,
        sender: &str,
        text: &str,
        highlight: bool,
    ) -> Result<(), ClientError> {
        self.send_reply(ReplyKind::Notice, network, channel, sender, text, highlight)
    }

    /// Replies to `sender` with a CTCP action.
    pub fn reply_action(
        &mut self,
        network: &str,
        channel: &str,
        sender: &str,
        text: &str,
    ) -> Result<(), ClientError> {
        self.send_reply(ReplyKind::Action, network, channel, sender, text, false)
    }

    /// Replies to `sender` with a CTCP reply.
    pub fn reply_ctcp_reply(
        &mut self,
        network: &str,
        channel: &str,
        sender: &str,
        text: &str,
    ) -> Result<(), ClientError> {
        self.send_reply(ReplyKind::CtcpReply, network, channel, sender, text, false)
    }

    /// Delivers a reply of any kind.
    ///
    /// `highlight` is ignored for actions and CTCP replies.
    pub fn send_reply(
        &mut self,
        kind: ReplyKind,
        network: &str,
        channel: &str,
        sender: &str,
        text: &str,
        highlight: bool,
    ) -> Result<(), ClientError> {
        let own_nick = self.nick(network)?;
        let (target, text) = if channel == own_nick {
            (sender, text.to_owned())
        } else if highlight && kind.supports_highlight() {
            (channel, format!("{sender}: {text}"))
        } else {
            (channel, text.to_owned())
        };

        match kind {
            ReplyKind::Message => self.message(network, target, &text),
            ReplyKind::Notice => self.notice(network, target, &text),
            ReplyKind::Action => self.action(network, target, &text),
            ReplyKind::CtcpReply => self.ctcp_reply(network, target, &text),
        }
    }
}

impl Event {
    /// Replies to the sender of this event with a message.
    pub fn reply<S: Read + Write>(
        &self,
        client: &mut DaZeus<S>,
        text: &str,
        highlight: bool,
    ) -> Result<(), ClientError> {
        client.reply(&self.network, &self.channel, &self.sender, text, highlight)
    }

    /// Replies to the sender of this event with a notice.
    pub fn reply_notice<S: Read + Write>(
        &self,
        client: &mut DaZeus<S>,
        text: &str,
        highlight: bool,
    ) -> Result<(), ClientError> {
        client.reply_notice(&self.network, &self.channel, &self.sender, text, highlight)
    }

    /// Replies to the sender of this event with a CTCP action.
    pub fn reply_action<S: Read + Write>(
        &self,
        client: &mut DaZeus<S>,
        text: &str,
    ) -> Result<(), ClientError> {
        client.reply_action(&self.network, &self.channel, &self.sender, text)
    }

    /// Replies to the sender of this event with a CTCP reply.
    pub fn reply_ctcp_reply<S: Read + Write>(
        &self,
        client: &mut DaZeus<S>,
        text: &str,
    ) -> Result<(), ClientError> {
        client.reply_ctcp_reply(&self.network, &self.channel, &self.sender, text)
    }
}
