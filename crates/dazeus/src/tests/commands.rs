use anyhow::Result;
use rstest::rstest;
use serde_json::{Value, json};

use super::support::{ScriptedStream, event, ok, scripted_client, sent};
use crate::{ClientError, ConfigGroup, DaZeus, Event, Message, ReplyKind, Scope};

type Action = fn(&mut DaZeus<ScriptedStream>) -> Result<(), ClientError>;

#[rstest]
#[case(|c: &mut DaZeus<ScriptedStream>| c.join("freenode", "#dazeus"),
    json!({"do": "join", "params": ["freenode", "#dazeus"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.part("freenode", "#dazeus"),
    json!({"do": "part", "params": ["freenode", "#dazeus"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.message("freenode", "#dazeus", "hello"),
    json!({"do": "message", "params": ["freenode", "#dazeus", "hello"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.action("freenode", "#dazeus", "waves"),
    json!({"do": "action", "params": ["freenode", "#dazeus", "waves"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.notice("freenode", "alice", "psst"),
    json!({"do": "notice", "params": ["freenode", "alice", "psst"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.ctcp("freenode", "alice", "VERSION"),
    json!({"do": "ctcp", "params": ["freenode", "alice", "VERSION"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.ctcp_reply("freenode", "alice", "VERSION dazeus"),
    json!({"do": "ctcp_rep", "params": ["freenode", "alice", "VERSION dazeus"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.whois("freenode", "alice"),
    json!({"do": "whois", "params": ["freenode", "alice"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.names("freenode", "#dazeus"),
    json!({"do": "names", "params": ["freenode", "#dazeus"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.set_property("greeting", "hi", &Scope::all()),
    json!({"do": "property", "params": ["set", "greeting", "hi"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.unset_property("greeting", &Scope::network("freenode")),
    json!({"do": "property", "scope": ["freenode"], "params": ["unset", "greeting"]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.set_permission("admin", &Scope::network("freenode").with_receiver("#dazeus"), true),
    json!({"do": "permission", "scope": ["freenode", "#dazeus"], "params": ["set", "admin", true]}))]
#[case(|c: &mut DaZeus<ScriptedStream>| c.unset_permission("admin", &Scope::network("freenode")),
    json!({"do": "permission", "scope": ["freenode"], "params": ["unset", "admin"]}))]
fn actions_send_one_request(#[case] action: Action, #[case] expected: Value) -> Result<()> {
    let mut client = scripted_client([ok(json!({}))]);

    action(&mut client)?;
    assert_eq!(sent(&client)?, vec![expected]);
    Ok(())
}

#[test]
fn networks_and_channels_are_string_lists() -> Result<()> {
    let mut client = scripted_client([
        ok(json!({"networks": ["freenode", "oftc"]})),
        ok(json!({"channels": ["#dazeus"]})),
    ]);

    assert_eq!(client.networks()?, vec!["freenode", "oftc"]);
    assert_eq!(client.channels("freenode")?, vec!["#dazeus"]);
    assert_eq!(
        sent(&client)?,
        vec![
            json!({"get": "networks"}),
            json!({"get": "channels", "params": ["freenode"]}),
        ]
    );
    Ok(())
}

#[test]
fn non_string_list_entries_are_rejected() {
    let mut client = scripted_client([ok(json!({"networks": ["freenode", 7]}))]);

    let error = client.networks().expect_err("mixed list");
    assert!(matches!(
        error,
        ClientError::InvalidField {
            field: "networks",
            ..
        }
    ));
}

#[rstest]
#[case(ConfigGroup::Plugin, "plugin")]
#[case(ConfigGroup::Core, "core")]
fn config_reads_value_from_group(#[case] group: ConfigGroup, #[case] wire: &str) -> Result<()> {
    let mut client = scripted_client([ok(json!({"value": "42"}))]);

    assert_eq!(client.config("answer", group)?, "42");
    assert_eq!(
        sent(&client)?,
        vec![json!({"get": "config", "params": [wire, "answer"]})]
    );
    Ok(())
}

#[test]
fn highlight_character_is_a_core_setting() -> Result<()> {
    let mut client = scripted_client([ok(json!({"value": "}"}))]);

    assert_eq!(client.highlight_character()?, "}");
    assert_eq!(
        sent(&client)?,
        vec![json!({"get": "config", "params": ["core", "highlight"]})]
    );
    Ok(())
}

#[test]
fn properties_are_scoped_only_when_restricted() -> Result<()> {
    let mut client = scripted_client([
        ok(json!({"value": "hello"})),
        ok(json!({"keys": ["greeting.en", "greeting.nl"]})),
    ]);

    assert_eq!(client.property("greeting", &Scope::all())?, "hello");
    let scope = Scope::network("freenode")
        .with_receiver("#dazeus")
        .with_sender("alice");
    assert_eq!(
        client.property_keys("greeting.", &scope)?,
        vec!["greeting.en", "greeting.nl"]
    );
    assert_eq!(
        sent(&client)?,
        vec![
            json!({"do": "property", "params": ["get", "greeting"]}),
            json!({
                "do": "property",
                "scope": ["freenode", "#dazeus", "alice"],
                "params": ["keys", "greeting."],
            }),
        ]
    );
    Ok(())
}

#[test]
fn missing_property_value_is_an_error() {
    let mut client = scripted_client([ok(json!({}))]);

    let error = client
        .property("greeting", &Scope::all())
        .expect_err("no value field");
    assert!(matches!(error, ClientError::MissingField { field: "value", .. }));
}

#[rstest]
#[case(true)]
#[case(false)]
fn has_permission_reads_the_answer(#[case] granted: bool) -> Result<()> {
    let mut client = scripted_client([ok(json!({"has_permission": granted}))]);
    let scope = Scope::network("freenode").with_receiver("#dazeus");

    assert_eq!(client.has_permission("admin", &scope, false)?, granted);
    assert_eq!(
        sent(&client)?,
        vec![json!({
            "do": "permission",
            "scope": ["freenode", "#dazeus"],
            "params": ["has", "admin", false],
        })]
    );
    Ok(())
}

#[test]
fn permissions_refuse_the_universal_scope_without_io() -> Result<()> {
    let mut client = scripted_client([]);

    let check = client.has_permission("admin", &Scope::all(), true);
    let set = client.set_permission("admin", &Scope::all(), true);
    let unset = client.unset_permission("admin", &Scope::all());

    assert!(matches!(check, Err(ClientError::UniversalScope { action: "check", .. })));
    assert!(matches!(set, Err(ClientError::UniversalScope { action: "set", .. })));
    assert!(matches!(unset, Err(ClientError::UniversalScope { action: "unset", .. })));
    assert!(sent(&client)?.is_empty());
    Ok(())
}

#[test]
fn private_messages_are_answered_privately() -> Result<()> {
    let mut client = scripted_client([ok(json!({"nick": "mybot"})), ok(json!({}))]);

    client.reply("freenode", "mybot", "alice", "hi there", true)?;
    assert_eq!(
        sent(&client)?,
        vec![
            json!({"get": "nick", "params": ["freenode"]}),
            json!({"do": "message", "params": ["freenode", "alice", "hi there"]}),
        ]
    );
    Ok(())
}

#[rstest]
#[case(ReplyKind::Message, true, json!({"do": "message", "params": ["freenode", "#dazeus", "alice: hi"]}))]
#[case(ReplyKind::Message, false, json!({"do": "message", "params": ["freenode", "#dazeus", "hi"]}))]
#[case(ReplyKind::Notice, true, json!({"do": "notice", "params": ["freenode", "#dazeus", "alice: hi"]}))]
#[case(ReplyKind::Action, true, json!({"do": "action", "params": ["freenode", "#dazeus", "hi"]}))]
#[case(ReplyKind::CtcpReply, true, json!({"do": "ctcp_rep", "params": ["freenode", "#dazeus", "hi"]}))]
fn channel_replies_highlight_only_messages_and_notices(
    #[case] kind: ReplyKind,
    #[case] highlight: bool,
    #[case] expected: Value,
) -> Result<()> {
    let mut client = scripted_client([ok(json!({"nick": "mybot"})), ok(json!({}))]);

    client.send_reply(kind, "freenode", "#dazeus", "alice", "hi", highlight)?;
    assert_eq!(sent(&client)?.last(), Some(&expected));
    Ok(())
}

#[test]
fn event_reply_answers_in_the_originating_channel() -> Result<()> {
    let mut client = scripted_client([
        ok(json!({})),
        event("COMMAND", &["freenode", "alice", "#dazeus", "ping"]),
        ok(json!({"nick": "mybot"})),
        ok(json!({})),
    ]);
    client.subscribe_command("ping", &Scope::all(), |client, event| {
        event.reply(client, "pong", true)
    })?;

    client.listen_once()?;
    assert_eq!(
        sent(&client)?.last(),
        Some(&json!({"do": "message", "params": ["freenode", "#dazeus", "alice: pong"]}))
    );
    Ok(())
}

#[test]
fn event_reply_action_goes_to_the_sender_in_private() -> Result<()> {
    let mut client = scripted_client([ok(json!({"nick": "mybot"})), ok(json!({}))]);
    let message: Message = serde_json::from_value(json!({
        "event": "PRIVMSG",
        "params": ["freenode", "alice", "mybot", "hello"],
    }))?;
    let event = Event::from_message(&message)?;

    event.reply_action(&mut client, "waves")?;
    assert_eq!(
        sent(&client)?.last(),
        Some(&json!({"do": "action", "params": ["freenode", "alice", "waves"]}))
    );
    Ok(())
}
