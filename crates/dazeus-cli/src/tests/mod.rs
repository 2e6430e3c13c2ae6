//! In-process runs of the CLI against a fake core.


use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use dazeus::{Event, Message, SocketEndpoint};
use dazeus_config::Config;
use rstest::rstest;
use serde_json::{Value, json};

use self::fake_core::FakeCore;
use crate::{AppError, ConfigLoader, render_event, run_with_loader};

struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    fn new(endpoint: SocketEndpoint) -> Self {
        Self {
            config: Config {
                core_socket: endpoint,
                ..Config::default()
            },
        }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_cli(command: &str, endpoint: SocketEndpoint) -> Result<Outcome> {
    let args = std::iter::once("dazeus")
        .chain(command.split_whitespace())
        .map(OsString::from);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run_with_loader(
        args,
        &mut stdout,
        &mut stderr,
        &StaticConfigLoader::new(endpoint),
    );
    Ok(Outcome {
        exit,
        stdout: String::from_utf8(stdout)?,
        stderr: String::from_utf8(stderr)?,
    })
}

fn ok(fields: Value) -> Value {
    let mut response = json!({"success": true});
    if let (Some(target), Value::Object(extra)) = (response.as_object_mut(), fields) {
        target.extend(extra);
    }
    response
}

#[test]
fn prints_one_network_per_line() -> Result<()> {
    let core = FakeCore::spawn(vec![vec![ok(json!({"networks": ["freenode", "oftc"]}))]])?;

    let outcome = run_cli("networks", core.endpoint())?;
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert_eq!(outcome.stdout, "freenode\noftc\n");
    assert_eq!(core.requests()?, vec![json!({"get": "networks"})]);
    Ok(())
}

#[rstest]
#[case("nick freenode", ok(json!({"nick": "mybot"})), json!({"get": "nick", "params": ["freenode"]}), "mybot\n")]
#[case("join freenode #dazeus", ok(json!({})), json!({"do": "join", "params": ["freenode", "#dazeus"]}), "")]
#[case("part freenode #dazeus", ok(json!({})), json!({"do": "part", "params": ["freenode", "#dazeus"]}), "")]
#[case("message freenode alice hi", ok(json!({})), json!({"do": "message", "params": ["freenode", "alice", "hi"]}), "")]
#[case(
    "property get greeting --network freenode --receiver #dazeus",
    ok(json!({"value": "hello"})),
    json!({"do": "property", "scope": ["freenode", "#dazeus"], "params": ["get", "greeting"]}),
    "hello\n"
)]
#[case(
    "property keys greeting.",
    ok(json!({"keys": ["greeting.en", "greeting.nl"]})),
    json!({"do": "property", "params": ["keys", "greeting."]}),
    "greeting.en\ngreeting.nl\n"
)]
fn single_request_commands(
    #[case] command: &str,
    #[case] reply: Value,
    #[case] expected_request: Value,
    #[case] expected_stdout: &str,
) -> Result<()> {
    let core = FakeCore::spawn(vec![vec![reply]])?;

    let outcome = run_cli(command, core.endpoint())?;
    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(outcome.stdout, expected_stdout);
    assert_eq!(core.requests()?, vec![expected_request]);
    Ok(())
}

#[test]
fn listen_prints_events_until_the_count_is_reached() -> Result<()> {
    let core = FakeCore::spawn(vec![
        vec![ok(json!({}))],
        vec![
            ok(json!({})),
            json!({"event": "PRIVMSG", "params": ["freenode", "alice", "#dazeus", "hello"]}),
            json!({"event": "JOIN", "params": ["freenode", "bob", "#dazeus"]}),
            json!({"event": "JOIN", "params": ["freenode", "carol", "#dazeus"]}),
        ],
    ])?;

    let outcome = run_cli("listen PRIVMSG join PRIVMSG --count 2", core.endpoint())?;
    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(
        outcome.stdout,
        "PRIVMSG freenode alice #dazeus hello\nJOIN freenode bob #dazeus\n"
    );
    assert_eq!(
        core.requests()?,
        vec![
            json!({"do": "subscribe", "params": ["PRIVMSG"]}),
            json!({"do": "subscribe", "params": ["JOIN"]}),
        ]
    );
    Ok(())
}

#[test]
fn core_failure_is_reported_on_stderr() -> Result<()> {
    let core = FakeCore::spawn(vec![vec![json!({"success": false})]])?;

    let outcome = run_cli("join freenode #secret", core.endpoint())?;
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.contains("core reported failure for 'join'"));
    core.requests()?;
    Ok(())
}

#[test]
fn unreachable_core_is_reported() -> Result<()> {
    let port = std::net::TcpListener::bind(("127.0.0.1", 0))?
        .local_addr()?
        .port();

    let outcome = run_cli("networks", SocketEndpoint::tcp("127.0.0.1", port))?;
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("failed to connect to core"));
    Ok(())
}

#[rstest]
#[case("")]
#[case("channels")]
#[case("listen")]
#[case("listen SNEEZE")]
fn usage_errors_fail_without_connecting(#[case] command: &str) -> Result<()> {
    let outcome = run_cli(command, SocketEndpoint::tcp("127.0.0.1", 9))?;
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(!outcome.stderr.is_empty());
    Ok(())
}

#[test]
fn help_goes_to_stdout() -> Result<()> {
    let outcome = run_cli("--help", SocketEndpoint::tcp("127.0.0.1", 9))?;
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("listen"));
    assert!(outcome.stderr.is_empty());
    Ok(())
}

#[rstest]
#[case(json!({"event": "CONNECT", "params": ["freenode"]}), "CONNECT freenode")]
#[case(
    json!({"event": "COMMAND", "params": ["freenode", "alice", "#dazeus", "echo", "a", "b"]}),
    "COMMAND freenode alice #dazeus echo a b"
)]
#[case(
    json!({"event": "PRIVMSG_ME", "params": ["freenode", "mybot", "alice", "hi"]}),
    "PRIVMSG_ME freenode mybot alice hi"
)]
fn renders_events_without_empty_fields(#[case] frame: Value, #[case] expected: &str) -> Result<()> {
    let message: Message = serde_json::from_value(frame)?;
    assert_eq!(render_event(&Event::from_message(&message)?), expected);
    Ok(())
}
