//! Command-line runtime for talking to a DaZeus core.
//!
//! The runtime loads configuration, connects, issues a single request and
//! prints the answer one value per line, or subscribes to event types and
//! prints each event as it arrives. Configuration loading and the output
//! streams are injectable so tests can run it in-process.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fmt::Display;
use std::io::{Read, Write};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use dazeus::{DaZeus, Event, EventKind, Scope};
use dazeus_config::Config;
use tracing::debug;

mod cli;
mod config;
mod errors;

use cli::{Cli, CliCommand, PropertyAction};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
pub(crate) use errors::AppError;

/// Flags handed to the configuration loader rather than the subcommand.
///
/// Keep in sync with the fields of [`dazeus_config::Config`].
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--core-socket",
    "--log-filter",
    "--log-format",
];

/// Runs the CLI with the given arguments and output streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let cli = match Cli::try_parse_from(&split.command_arguments) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            let _ = write!(stderr, "{}", AppError::CliUsage(error));
            return ExitCode::FAILURE;
        }
    };

    let result = loader
        .load(&split.config_arguments)
        .and_then(|config| {
            dazeus::telemetry::initialise(&config)?;
            Ok(config)
        })
        .and_then(|config| execute(cli.command, &config, stdout));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(command: CliCommand, config: &Config, stdout: &mut W) -> Result<(), AppError> {
    let mut client = DaZeus::connect(config.core_socket())?;
    debug!(endpoint = %config.core_socket(), ?command, "running command");
    perform(&mut client, command, stdout)?;
    client.close()?;
    Ok(())
}

fn perform<S, W>(client: &mut DaZeus<S>, command: CliCommand, stdout: &mut W) -> Result<(), AppError>
where
    S: Read + Write,
    W: Write,
{
    match command {
        CliCommand::Networks => write_lines(stdout, client.networks()?),
        CliCommand::Channels { network } => write_lines(stdout, client.channels(&network)?),
        CliCommand::Nick { network } => write_lines(stdout, [client.nick(&network)?]),
        CliCommand::Join { network, channel } => Ok(client.join(&network, &channel)?),
        CliCommand::Part { network, channel } => Ok(client.part(&network, &channel)?),
        CliCommand::Message {
            network,
            target,
            text,
        } => Ok(client.message(&network, &target, &text)?),
        CliCommand::Property { action } => match action {
            PropertyAction::Get { name, scope } => {
                write_lines(stdout, [client.property(&name, &Scope::from(scope))?])
            }
            PropertyAction::Keys { prefix, scope } => {
                write_lines(stdout, client.property_keys(&prefix, &Scope::from(scope))?)
            }
        },
        CliCommand::Listen { events, count } => listen(client, &events, count, stdout),
    }
}

fn listen<S, W>(
    client: &mut DaZeus<S>,
    kinds: &[EventKind],
    count: Option<usize>,
    stdout: &mut W,
) -> Result<(), AppError>
where
    S: Read + Write,
    W: Write,
{
    let received: Rc<RefCell<VecDeque<Event>>> = Rc::default();
    let mut subscribed: Vec<EventKind> = Vec::new();
    for &kind in kinds {
        if subscribed.contains(&kind) {
            continue;
        }
        let sink = Rc::clone(&received);
        client.subscribe(kind, move |_, event| {
            sink.borrow_mut().push_back(event.clone());
            Ok(())
        })?;
        subscribed.push(kind);
    }

    let mut printed = 0_usize;
    loop {
        while let Some(event) = received.borrow_mut().pop_front() {
            if count.is_some_and(|limit| printed >= limit) {
                return Ok(());
            }
            write_lines(stdout, [render_event(&event)])?;
            printed += 1;
        }
        if count.is_some_and(|limit| printed >= limit) {
            return Ok(());
        }
        client.listen_once()?;
    }
}

/// One line per event: kind, network, sender, channel, command and payload,
/// leaving out empty fields.
fn render_event(event: &Event) -> String {
    let fields = [
        event.network.as_str(),
        event.sender.as_str(),
        event.channel.as_str(),
        event.command.as_deref().unwrap_or_default(),
    ];
    let mut line = event.kind.to_string();
    for field in fields
        .into_iter()
        .chain(event.params.iter().map(String::as_str))
        .filter(|field| !field.is_empty())
    {
        line.push(' ');
        line.push_str(field);
    }
    line
}

fn write_lines<W, T>(stdout: &mut W, lines: impl IntoIterator<Item = T>) -> Result<(), AppError>
where
    W: Write,
    T: Display,
{
    for line in lines {
        writeln!(stdout, "{line}").map_err(AppError::WriteOutput)?;
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

#[cfg(test)]
mod tests;
