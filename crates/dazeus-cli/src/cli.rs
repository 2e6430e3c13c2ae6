//! Command-line grammar of the `dazeus` binary.
//!
//! Configuration flags (`--core-socket`, `--log-filter`, ...) are split off
//! before this parser runs, so only the subcommands live here.

use clap::{Args, Parser, Subcommand};
use dazeus::{EventKind, Scope};

/// Talks to a running DaZeus core.
#[derive(Parser, Debug)]
#[command(name = "dazeus", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// What to ask the core.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// One request, or a stream of events.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Lists the networks the core is connected to.
    Networks,
    /// Lists the channels joined on a network.
    Channels {
        /// Network name.
        network: String,
    },
    /// Prints the bot's nick on a network.
    Nick {
        /// Network name.
        network: String,
    },
    /// Joins a channel.
    Join {
        /// Network name.
        network: String,
        /// Channel to join.
        channel: String,
    },
    /// Leaves a channel.
    Part {
        /// Network name.
        network: String,
        /// Channel to leave.
        channel: String,
    },
    /// Sends a message to a channel or nick.
    Message {
        /// Network name.
        network: String,
        /// Channel or nick.
        target: String,
        /// Text to send.
        text: String,
    },
    /// Reads stored properties.
    Property {
        /// Property operation.
        #[command(subcommand)]
        action: PropertyAction,
    },
    /// Prints events as they arrive.
    Listen {
        /// Event types to subscribe to, for example `PRIVMSG JOIN`.
        #[arg(value_name = "EVENT", required = true)]
        events: Vec<EventKind>,
        /// Stop after this many events.
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },
}

/// Property subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum PropertyAction {
    /// Prints a property value.
    Get {
        /// Property name.
        name: String,
        /// Scope to read from.
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Lists property names starting with a prefix.
    Keys {
        /// Name prefix.
        prefix: String,
        /// Scope to read from.
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

/// Optional restriction of a property lookup.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ScopeArgs {
    /// Restrict to a network.
    #[arg(long)]
    pub(crate) network: Option<String>,
    /// Restrict to a channel or nick on the network.
    #[arg(long, requires = "network")]
    pub(crate) receiver: Option<String>,
    /// Restrict to a sender within the receiver.
    #[arg(long, requires = "receiver")]
    pub(crate) sender: Option<String>,
}

impl From<ScopeArgs> for Scope {
    fn from(args: ScopeArgs) -> Self {
        Self {
            network: args.network,
            receiver: args.receiver,
            sender: args.sender,
        }
    }
}
