//! Lifecycle tests: construction, the ready handshake, command ordering
//! and teardown.

use std::collections::BTreeMap;

use embedhost::app::events::HostEvent;
use embedhost::app::lifecycle::EmbedLifecycle;
use embedhost::bridge::InboundMessage;
use embedhost::config::HostConfiguration;
use embedhost::error::HostError;
use embedhost::events::InboundEvent;
use embedhost::state::{ReadyState, SurfaceId};
use embedhost::{HostCommand, ResetOptions};
use serde_json::{Value, json};

use crate::mock_host::{
    Harness, MockReachability, MockView, MockWebView, RecordingSink, WebCall,
};

// ── Construction ──────────────────────────────────────────────

#[test]
fn creation_starts_loading_the_routing_url() {
    let h = Harness::new(HostConfiguration::new("acme").with_cluster("eu"), true);
    let calls = h.web.calls.borrow();
    assert_eq!(
        calls[0],
        WebCall::Create {
            id: SurfaceId::FIRST,
            url: "https://acme.eu.ada.support/mobile-sdk-webview/".into(),
        }
    );
    assert_eq!(h.host.ready_state(), ReadyState::NotReady);
    assert!(h.sink.contains(&HostEvent::SurfaceLoading(SurfaceId::FIRST)));
}

#[test]
fn creation_fails_when_reachability_cannot_start() {
    let web = MockWebView::default();
    let result = EmbedLifecycle::create(
        HostConfiguration::new("acme"),
        web.clone(),
        MockReachability::failing(),
        MockView::default(),
        RecordingSink::default(),
    );
    assert!(matches!(result, Err(HostError::Connectivity(_))));
    assert!(web.created().is_empty());
}

#[test]
fn creation_rejects_invalid_configuration() {
    let result = EmbedLifecycle::create(
        HostConfiguration::new("not a host"),
        MockWebView::default(),
        MockReachability::new(true),
        MockView::default(),
        RecordingSink::default(),
    );
    assert!(matches!(result, Err(HostError::InvalidConfig(_))));
}

// ── Ready contract ────────────────────────────────────────────

#[test]
fn metadata_before_ready_is_delivered_after_initialize() {
    let mut h = Harness::online("acme");
    h.host
        .set_meta_fields(&json!({ "firstName": "Sam" }))
        .unwrap();
    assert!(h.web.scripts().is_empty());
    assert_eq!(h.host.queued_commands(), 1);

    h.ready();

    let got = h.web.instructions();
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].0, "initializeEmbed");
    assert_eq!(got[0].1.as_ref().unwrap()["handle"], "acme");
    assert_eq!(got[1].0, "setMetaFields");
    assert_eq!(got[1].1, Some(json!({ "firstName": "Sam" })));
    assert_eq!(h.host.queued_commands(), 0);
}

#[test]
fn queued_commands_flush_in_issue_order() {
    let mut h = Harness::online("acme");
    h.host.reset(ResetOptions::default()).unwrap();
    h.host.delete_history().unwrap();
    h.host.set_meta_fields(&json!({ "plan": "pro" })).unwrap();

    h.ready();

    assert_eq!(
        h.web.function_names(),
        [
            "initializeEmbed",
            "adaEmbed.reset",
            "adaEmbed.deleteHistory",
            "setMetaFields",
        ]
    );
    assert!(h.sink.contains(&HostEvent::QueueFlushed { count: 3 }));
}

#[test]
fn construction_metadata_follows_queued_commands() {
    let config = HostConfiguration::new("acme").with_metafield("tier", "gold");
    let mut h = Harness::new(config, true);
    h.host.delete_history().unwrap();

    h.ready();

    let got = h.web.instructions();
    assert_eq!(
        got.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        ["initializeEmbed", "adaEmbed.deleteHistory", "setMetaFields"]
    );
    assert_eq!(got[2].1, Some(json!({ "tier": "gold" })));
}

#[test]
fn commands_after_ready_are_delivered_immediately() {
    let mut h = Harness::online("acme");
    h.ready();
    h.host.issue_command(HostCommand::DeleteHistory).unwrap();

    assert_eq!(h.host.queued_commands(), 0);
    assert_eq!(
        h.web.function_names(),
        ["initializeEmbed", "adaEmbed.deleteHistory"]
    );
}

#[test]
fn reset_options_travel_in_camel_case() {
    let mut h = Harness::online("acme");
    h.ready();
    h.host
        .reset(ResetOptions {
            language: Some("fr".into()),
            reset_chat_history: Some(true),
            ..ResetOptions::default()
        })
        .unwrap();

    let (name, payload) = h.web.instructions().pop().unwrap();
    assert_eq!(name, "adaEmbed.reset");
    assert_eq!(
        payload,
        Some(json!({ "language": "fr", "resetChatHistory": true }))
    );
}

#[test]
fn second_ready_signal_is_ignored() {
    let mut h = Harness::online("acme");
    h.host.delete_history().unwrap();
    h.ready();
    let after_first = h.web.scripts();

    h.ready();
    h.ready();

    assert_eq!(h.web.scripts(), after_first);
    assert_eq!(h.sink.count(|e| matches!(e, HostEvent::Ready(_))), 1);
}

#[test]
fn other_messages_do_not_count_as_ready() {
    let mut h = Harness::online("acme");
    let surface = h.surface();
    h.host.sender().post(InboundEvent::Message(InboundMessage {
        surface,
        name: "somethingElse".into(),
        body: Value::Null,
    }));
    h.host.pump();

    assert_eq!(h.host.ready_state(), ReadyState::NotReady);
    assert!(h.web.scripts().is_empty());
}

#[test]
fn unserializable_metadata_is_dropped_and_queue_survives() {
    let mut h = Harness::online("acme");
    h.host.delete_history().unwrap();

    let mut bad: BTreeMap<(i32, i32), &str> = BTreeMap::new();
    bad.insert((1, 2), "x");
    h.host.set_meta_fields(&bad).unwrap();
    h.host.set_meta_fields(&42).unwrap();

    assert_eq!(h.host.queued_commands(), 1);
    assert_eq!(
        h.sink
            .count(|e| matches!(e, HostEvent::CommandDropped { label: "setMetaFields", .. })),
        2
    );

    h.ready();
    assert_eq!(
        h.web.function_names(),
        ["initializeEmbed", "adaEmbed.deleteHistory"]
    );
}

#[test]
fn script_failures_are_reported_and_nothing_else_changes() {
    let mut h = Harness::online("acme");
    h.ready();
    let surface = h.surface();
    h.host.sender().post(InboundEvent::ScriptCompleted {
        surface,
        outcome: Err("ReferenceError: adaEmbed is not defined".into()),
    });
    h.host.sender().post(InboundEvent::ScriptCompleted {
        surface,
        outcome: Ok(Some(json!(true))),
    });
    h.host.pump();

    assert_eq!(h.sink.count(|e| matches!(e, HostEvent::ScriptFailed { .. })), 1);
    assert_eq!(h.host.ready_state(), ReadyState::Ready);
}

#[test]
fn keyboard_hidden_resets_scroll_of_live_surface() {
    let mut h = Harness::online("acme");
    h.host.sender().post(InboundEvent::KeyboardHidden);
    h.host.pump();

    assert!(
        h.web
            .calls
            .borrow()
            .contains(&WebCall::ResetScroll(SurfaceId::FIRST))
    );
}

// ── Teardown ──────────────────────────────────────────────────

#[test]
fn teardown_releases_everything() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("root").unwrap();
    h.host.delete_history().unwrap();

    h.host.teardown();

    assert!(h.host.is_torn_down());
    assert!(h.net.stopped());
    assert_eq!(h.web.destroyed(), [SurfaceId::FIRST]);
    assert_eq!(h.host.queued_commands(), 0);
    assert!(h.sink.contains(&HostEvent::Detached));
    assert!(h.sink.contains(&HostEvent::TornDown { discarded: 1 }));
}

#[test]
fn commands_after_teardown_are_rejected() {
    let mut h = Harness::online("acme");
    h.host.teardown();

    assert!(matches!(h.host.delete_history(), Err(HostError::TornDown)));
    assert!(matches!(
        h.host.set_meta_fields(&json!({ "a": "b" })),
        Err(HostError::TornDown)
    ));
    assert!(matches!(h.host.attach_modal("vc"), Err(HostError::TornDown)));
}

#[test]
fn late_ready_after_teardown_is_ignored() {
    let mut h = Harness::online("acme");
    let surface = h.surface();
    let sender = h.host.sender();
    h.host.teardown();

    sender.post(InboundEvent::Message(InboundMessage {
        surface,
        name: "embedReady".into(),
        body: Value::Null,
    }));
    h.host.pump();

    assert!(h.web.scripts().is_empty());
    assert_eq!(h.host.ready_state(), ReadyState::NotReady);
}

#[test]
fn dropping_the_host_tears_down_once() {
    let h = Harness::online("acme");
    let sink = h.sink.clone();
    let web = h.web.clone();
    drop(h);

    assert_eq!(sink.count(|e| matches!(e, HostEvent::TornDown { .. })), 1);
    assert_eq!(web.destroyed(), [SurfaceId::FIRST]);
}

#[test]
fn snapshot_reflects_state() {
    let mut h = Harness::online("acme");
    h.host.delete_history().unwrap();
    let snap = h.host.snapshot();
    assert_eq!(snap.surface, Some(SurfaceId::FIRST));
    assert_eq!(snap.ready, ReadyState::NotReady);
    assert_eq!(snap.queued_commands, 1);
    assert!(!snap.overlay_shown);
    assert!(!snap.torn_down);
}

// ── Bundled adapters ──────────────────────────────────────────

#[test]
fn bundled_adapters_drive_a_host() {
    use embedhost::adapters::log_sink::LogEventSink;
    use embedhost::adapters::reachability::ManualReachability;
    use embedhost::state::ConnectivityState;

    let (source, switch) = ManualReachability::new(true);
    let view = MockView::default();
    let mut host = EmbedLifecycle::create(
        HostConfiguration::new("acme"),
        MockWebView::default(),
        source,
        view.clone(),
        LogEventSink::new(),
    )
    .unwrap();
    host.attach_inline("parent").unwrap();

    switch.set_reachable(false);
    host.pump();

    assert_eq!(host.connectivity(), ConnectivityState::Offline);
    assert_eq!(view.overlay_shows(), 1);
}

#[test]
fn ready_survives_a_flooded_inbox() {
    let mut h = Harness::online("acme");
    h.host.delete_history().unwrap();
    let surface = h.surface();
    let sender = h.host.sender();
    for _ in 0..200 {
        sender.post(InboundEvent::KeyboardHidden);
        sender.post(InboundEvent::ScriptCompleted {
            surface,
            outcome: Ok(None),
        });
    }

    h.ready();

    assert_eq!(h.host.ready_state(), ReadyState::Ready);
    assert_eq!(
        h.web.function_names(),
        ["initializeEmbed", "adaEmbed.deleteHistory"]
    );
}
