//! Connectivity tests: the offline placeholder, retry and surface
//! recreation.

use embedhost::app::events::HostEvent;
use embedhost::events::InboundEvent;
use embedhost::presentation::ContainerKind;
use embedhost::state::{ConnectivityState, ReadyState, SurfaceId};

use crate::mock_host::{Harness, ViewCall};

const SECOND: SurfaceId = SurfaceId::new(2);

fn retry(h: &mut Harness) {
    h.host.sender().post(InboundEvent::RetryRequested);
    h.host.pump();
}

// ── Offline placeholder ───────────────────────────────────────

#[test]
fn offline_edge_while_mounted_shows_placeholder() {
    let mut h = Harness::online("acme");
    h.host.attach_modal("presenter").unwrap();
    assert!(!h.host.is_overlay_shown());

    h.go_offline();

    assert_eq!(h.host.connectivity(), ConnectivityState::Offline);
    assert!(h.host.is_overlay_shown());
    assert_eq!(
        h.view.calls.borrow().last(),
        Some(&ViewCall::ShowOverlay(SurfaceId::FIRST))
    );
}

#[test]
fn repeated_offline_keeps_a_single_placeholder() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();

    h.go_offline();
    h.host.on_connectivity_changed(ConnectivityState::Offline);
    h.host.on_connectivity_changed(ConnectivityState::Offline);

    assert_eq!(h.view.overlay_shows(), 1);
    assert_eq!(h.sink.count(|e| *e == HostEvent::OverlayShown), 1);
}

#[test]
fn coming_back_online_leaves_placeholder_up() {
    let mut h = Harness::online("acme");
    h.host.attach_pushed("nav").unwrap();
    h.go_offline();

    h.go_online();

    assert_eq!(h.host.connectivity(), ConnectivityState::Online);
    assert!(h.host.is_overlay_shown());
    assert_eq!(h.view.overlay_hides(), 0);
}

#[test]
fn offline_while_unmounted_shows_placeholder_on_attach() {
    let mut h = Harness::offline("acme");
    assert!(!h.host.is_overlay_shown());

    h.host.attach_modal("presenter").unwrap();

    assert!(h.host.is_overlay_shown());
    assert_eq!(
        *h.view.calls.borrow(),
        [
            ViewCall::Attach(SurfaceId::FIRST, ContainerKind::Modal, "presenter"),
            ViewCall::ShowOverlay(SurfaceId::FIRST),
        ]
    );
}

// ── Retry ─────────────────────────────────────────────────────

#[test]
fn retry_while_offline_does_nothing() {
    let mut h = Harness::offline("acme");
    h.host.attach_inline("parent").unwrap();
    let before = h.host.snapshot();

    retry(&mut h);

    assert_eq!(h.host.snapshot(), before);
    assert_eq!(h.web.created(), [SurfaceId::FIRST]);
    assert_eq!(h.view.overlay_hides(), 0);
}

#[test]
fn retry_before_ready_recreates_surface_and_keeps_queue() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();
    h.host.delete_history().unwrap();
    h.go_offline();
    h.go_online();

    retry(&mut h);

    assert!(!h.host.is_overlay_shown());
    assert_eq!(h.web.destroyed(), [SurfaceId::FIRST]);
    assert_eq!(h.web.created(), [SurfaceId::FIRST, SECOND]);
    assert_eq!(h.host.current_surface(), Some(SECOND));
    assert_eq!(h.host.ready_state(), ReadyState::NotReady);
    assert_eq!(h.host.queued_commands(), 1);
    assert!(
        h.view
            .calls
            .borrow()
            .contains(&ViewCall::Replace(SurfaceId::FIRST, SECOND))
    );

    h.ready();
    assert_eq!(
        h.web.function_names(),
        ["initializeEmbed", "adaEmbed.deleteHistory"]
    );
}

#[test]
fn ready_from_discarded_surface_is_ignored() {
    let mut h = Harness::online("acme");
    h.host.delete_history().unwrap();
    retry(&mut h);
    assert_eq!(h.host.current_surface(), Some(SECOND));

    h.ready_from(SurfaceId::FIRST);

    assert_eq!(h.host.ready_state(), ReadyState::NotReady);
    assert!(h.web.scripts().is_empty());
    assert_eq!(h.host.queued_commands(), 1);
}

#[test]
fn retry_after_ready_only_dismisses_placeholder() {
    let mut h = Harness::online("acme");
    h.ready();
    h.go_offline();
    h.host.attach_modal("presenter").unwrap();
    assert!(h.host.is_overlay_shown());

    h.go_online();
    assert!(h.host.is_overlay_shown());

    retry(&mut h);

    assert!(!h.host.is_overlay_shown());
    assert_eq!(h.web.created(), [SurfaceId::FIRST]);
    assert!(h.web.destroyed().is_empty());
    assert_eq!(h.host.ready_state(), ReadyState::Ready);
    assert!(h.sink.contains(&HostEvent::OverlayDismissed));
}

// ── Load failure ──────────────────────────────────────────────

#[test]
fn load_failure_goes_offline_and_retry_recovers() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();

    h.host.sender().post(InboundEvent::LoadFailed {
        surface: SurfaceId::FIRST,
        reason: "The request timed out.".into(),
    });
    h.host.pump();

    assert_eq!(h.host.connectivity(), ConnectivityState::Offline);
    assert!(h.host.is_overlay_shown());

    // No reachability edge arrives; the source still reports reachable.
    retry(&mut h);

    assert_eq!(h.host.connectivity(), ConnectivityState::Online);
    assert!(!h.host.is_overlay_shown());
    assert_eq!(h.host.current_surface(), Some(SECOND));
}

#[test]
fn load_failure_while_unreachable_keeps_placeholder_on_retry() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();
    h.net.set_silently(false);
    h.host.on_load_failed(SurfaceId::FIRST, "offline");

    retry(&mut h);

    assert!(h.host.is_overlay_shown());
    assert_eq!(h.web.created(), [SurfaceId::FIRST]);
}

#[test]
fn load_failure_from_stale_surface_is_ignored() {
    let mut h = Harness::online("acme");
    retry(&mut h);

    h.host.on_load_failed(SurfaceId::FIRST, "cancelled");

    assert_eq!(h.host.connectivity(), ConnectivityState::Online);
    assert_eq!(h.sink.count(|e| matches!(e, HostEvent::LoadFailed { .. })), 0);
}

#[test]
fn edges_after_teardown_are_ignored() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();
    h.host.teardown();

    h.net.fire(false);
    h.host.pump();
    h.host.on_connectivity_changed(ConnectivityState::Offline);

    assert_eq!(h.host.connectivity(), ConnectivityState::Online);
    assert_eq!(h.view.overlay_shows(), 0);
}

#[test]
fn offline_edge_survives_a_burst_of_script_results() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();
    for _ in 0..100 {
        h.host.delete_history().unwrap();
    }
    h.ready();

    let surface = h.surface();
    let sender = h.host.sender();
    for _ in 0..h.web.scripts().len() {
        sender.post(InboundEvent::ScriptCompleted {
            surface,
            outcome: Ok(None),
        });
    }
    h.go_offline();

    assert_eq!(h.host.connectivity(), ConnectivityState::Offline);
    assert!(h.host.is_overlay_shown());
}

#[test]
fn sampled_and_reported_offline_share_one_path() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();

    h.go_offline();
    h.host.on_connectivity_changed(ConnectivityState::Offline);
    h.go_offline();

    assert_eq!(
        h.sink
            .count(|e| *e == HostEvent::ConnectivityChanged(ConnectivityState::Offline)),
        1
    );
    assert_eq!(h.view.overlay_shows(), 1);
}

// ── Detach ────────────────────────────────────────────────────

#[test]
fn placeholder_returns_on_reattach_until_retry() {
    let mut h = Harness::online("acme");
    h.host.attach_inline("parent").unwrap();
    h.go_offline();
    h.go_online();

    h.host.detach().unwrap();
    assert!(h.host.is_overlay_shown());
    h.host.attach_modal("presenter").unwrap();

    assert_eq!(h.host.ready_state(), ReadyState::NotReady);
    assert!(h.host.is_overlay_shown());
    assert_eq!(
        h.view.calls.borrow().last(),
        Some(&ViewCall::ShowOverlay(SurfaceId::FIRST))
    );
    assert_eq!(h.sink.count(|e| *e == HostEvent::OverlayDismissed), 0);

    retry(&mut h);

    assert!(!h.host.is_overlay_shown());
    assert_eq!(h.host.current_surface(), Some(SECOND));
}
