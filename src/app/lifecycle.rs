//! Embed lifecycle: the orchestrator.
//!
//! [`EmbedLifecycle`] owns the content surface, the connectivity monitor,
//! the pending command queue and the presentation adapter, and reconciles
//! readiness, connectivity and host commands into one consistent state.
//!
//! ```text
//!  host commands ──▶ ┌───────────────────────────┐ ──▶ ContentBridge ──▶ WebViewPort
//!                    │       EmbedLifecycle       │
//!  EventQueue ─pump─▶│ Ready × Online × Overlay   │ ──▶ PresentationAdapter ──▶ ViewPort
//!                    └───────────────────────────┘ ──▶ EventSink
//! ```
//!
//! ## Ready contract
//!
//! On the first ready signal from the live surface, in this order:
//! 1. the initialize instruction carrying the host configuration,
//! 2. every queued command, oldest first,
//! 3. the construction-time metadata, if any.
//!
//! ## Threading
//!
//! All methods take `&mut self` and must run on the owner context.  Platform
//! callbacks go through [`EventSender`] and are applied by [`pump`](EmbedLifecycle::pump).

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::bridge::{ContentBridge, InboundMessage, LoadRequest, ScriptOutcome, codec};
use crate::config::HostConfiguration;
use crate::connectivity::ConnectivityMonitor;
use crate::error::{HostError, Result};
use crate::events::{EventQueue, EventSender, InboundEvent};
use crate::links::{self, NavigationAction, NavigationDecision};
use crate::presentation::{ContainerKind, PresentationAdapter};
use crate::queue::CommandQueue;
use crate::state::{ConnectivityState, LifecycleSnapshot, ReadyState, SurfaceId};

use super::commands::{HostCommand, ResetOptions};
use super::events::HostEvent;
use super::ports::{EventSink, LinkPort, ReachabilityPort, ViewPort, WebViewPort};

// ───────────────────────────────────────────────────────────────
// EmbedLifecycle
// ───────────────────────────────────────────────────────────────

pub struct EmbedLifecycle<W, R, V, S>
where
    W: WebViewPort,
    R: ReachabilityPort,
    V: ViewPort,
    S: EventSink,
{
    config: HostConfiguration,
    webview: W,
    bridge: ContentBridge,
    monitor: ConnectivityMonitor<R>,
    presentation: PresentationAdapter<V>,
    sink: S,
    queue: CommandQueue,
    inbox: EventQueue,
    ready: ReadyState,
    torn_down: bool,
}

impl<W, R, V, S> EmbedLifecycle<W, R, V, S>
where
    W: WebViewPort,
    R: ReachabilityPort,
    V: ViewPort,
    S: EventSink,
{
    /// Validate the configuration, start the connectivity monitor and begin
    /// loading the content surface.
    ///
    /// Fails only if the configuration is invalid or the reachability source
    /// cannot be started.  Load failures surface later through the offline
    /// path.
    pub fn create(
        config: HostConfiguration,
        webview: W,
        reachability: R,
        view: V,
        sink: S,
    ) -> Result<Self> {
        config.validate()?;

        let inbox = EventQueue::new();
        let monitor = ConnectivityMonitor::start(reachability, inbox.sender())?;

        let mut host = Self {
            config,
            webview,
            bridge: ContentBridge::new(),
            monitor,
            presentation: PresentationAdapter::new(view),
            sink,
            queue: CommandQueue::new(),
            inbox,
            ready: ReadyState::NotReady,
            torn_down: false,
        };
        host.load_surface();
        info!(
            "Host '{}' created ({:?})",
            host.config.handle,
            host.monitor.state()
        );
        Ok(host)
    }

    // ── Inbound marshalling ───────────────────────────────────

    /// Handle for platform callbacks running on other threads.
    pub fn sender(&self) -> EventSender {
        self.inbox.sender()
    }

    /// Apply every pending inbound event in FIFO order.  Returns how many
    /// were processed.
    pub fn pump(&mut self) -> usize {
        let mut n = 0;
        while let Some(event) = self.inbox.pop() {
            self.dispatch(event);
            n += 1;
        }
        n
    }

    /// Apply a single inbound event.
    pub fn dispatch(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Message(message) => self.on_message(&message),
            InboundEvent::Ready(surface) => self.on_ready_signal(surface),
            InboundEvent::Reachability(reachable) => {
                self.on_connectivity_changed(ConnectivityState::from_reachable(reachable));
            }
            InboundEvent::LoadFailed { surface, reason } => self.on_load_failed(surface, &reason),
            InboundEvent::ScriptCompleted { surface, outcome } => {
                self.on_script_completed(surface, &outcome);
            }
            InboundEvent::RetryRequested => self.retry(),
            InboundEvent::KeyboardHidden => self.on_keyboard_hidden(),
        }
    }

    // ── Command API ───────────────────────────────────────────

    /// Deliver `cmd` now if the surface is ready, otherwise queue it.
    ///
    /// Fire-and-forget: the only error is calling this after teardown.  A
    /// command that cannot be serialized is logged and dropped.
    pub fn issue_command(&mut self, cmd: HostCommand) -> Result<()> {
        if self.torn_down {
            return Err(HostError::TornDown);
        }
        let label = cmd.label();
        match cmd.to_script() {
            Ok(script) => self.submit(label, script),
            Err(e) => self.drop_command(label, &e),
        }
        Ok(())
    }

    /// Push metadata fields.  `fields` must serialize to a JSON object.
    pub fn set_meta_fields<T: Serialize + ?Sized>(&mut self, fields: &T) -> Result<()> {
        if self.torn_down {
            return Err(HostError::TornDown);
        }
        match codec::to_meta_object(fields) {
            Ok(map) => self.issue_command(HostCommand::SetMetaFields(map)),
            Err(e) => {
                self.drop_command("setMetaFields", &e);
                Ok(())
            }
        }
    }

    pub fn reset(&mut self, options: ResetOptions) -> Result<()> {
        self.issue_command(HostCommand::Reset(options))
    }

    pub fn delete_history(&mut self) -> Result<()> {
        self.issue_command(HostCommand::DeleteHistory)
    }

    // ── Transitions ───────────────────────────────────────────

    /// Inbound message from the content.
    pub fn on_message(&mut self, message: &InboundMessage) {
        if self.torn_down {
            debug!("Message '{}' after teardown ignored", message.name);
            return;
        }
        if let Some(surface) = self.bridge.recognize_ready(message) {
            self.on_ready_signal(surface);
        }
    }

    /// The live surface finished loading and accepts instructions.
    pub fn on_ready_signal(&mut self, surface: SurfaceId) {
        if self.torn_down {
            debug!("Ready from {} after teardown ignored", surface);
            return;
        }
        if !self.bridge.is_current(surface) {
            debug!("Ready from stale {} ignored", surface);
            return;
        }
        if self.ready.is_ready() {
            debug!("Duplicate ready from {} ignored", surface);
            return;
        }

        let init = match codec::initialize_script(&self.config) {
            Ok(script) => script,
            Err(e) => {
                error!("Initialize payload unserializable: {}", e);
                return;
            }
        };

        self.ready = ReadyState::Ready;
        info!("{} ready", surface);
        self.sink.emit(&HostEvent::Ready(surface));

        // 1. Initialize
        self.bridge.execute(&mut self.webview, "initialize", &init);

        // 2. Queued commands, oldest first
        let pending = self.queue.take_all();
        let count = pending.len();
        for cmd in &pending {
            self.bridge.execute(&mut self.webview, cmd.label, &cmd.script);
        }
        if let (Some(first), Some(last)) = (pending.first(), pending.last()) {
            info!(
                "Flushed {} queued command(s), seq {}..={}",
                count, first.seq, last.seq
            );
            self.sink.emit(&HostEvent::QueueFlushed { count });
        }

        // 3. Construction-time metadata
        if !self.config.metafields.is_empty() {
            match codec::set_meta_fields_script(&self.config.metafields) {
                Ok(script) => {
                    self.bridge.execute(&mut self.webview, "setMetaFields", &script);
                }
                Err(e) => self.drop_command("setMetaFields", &e),
            }
        }
    }

    /// A connectivity state reported by the signal source.
    pub fn on_connectivity_changed(&mut self, state: ConnectivityState) {
        if self.torn_down {
            return;
        }
        match self.monitor.record(state) {
            Some(changed) => self.apply_connectivity(changed),
            // Repeated Offline still re-asserts the placeholder (idempotent).
            None if !state.is_online() => self.show_overlay_if_mounted(),
            None => {}
        }
    }

    /// The surface could not load.  Treated as going offline.
    pub fn on_load_failed(&mut self, surface: SurfaceId, reason: &str) {
        if self.torn_down || !self.bridge.is_current(surface) {
            debug!("Load failure from stale {} ignored", surface);
            return;
        }
        warn!("{} failed to load: {}", surface, reason);
        self.sink.emit(&HostEvent::LoadFailed {
            surface,
            reason: reason.to_string(),
        });
        if let Some(state) = self.monitor.record_load_failure() {
            self.sink.emit(&HostEvent::ConnectivityChanged(state));
        }
        self.show_overlay_if_mounted();
    }

    /// A script finished on the surface.  Logged only.
    pub fn on_script_completed(&mut self, surface: SurfaceId, outcome: &ScriptOutcome) {
        if self.torn_down {
            return;
        }
        if let Some(error) = self.bridge.observe_outcome(surface, outcome) {
            self.sink.emit(&HostEvent::ScriptFailed { surface, error });
        }
    }

    /// The placeholder's retry action.
    ///
    /// No-op while offline.  Otherwise dismisses the placeholder and, if the
    /// current surface never became ready, replaces it with a fresh one.
    pub fn retry(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(state) = self.monitor.refresh() {
            self.sink.emit(&HostEvent::ConnectivityChanged(state));
        }
        if !self.monitor.state().is_online() {
            debug!("Retry while offline ignored");
            return;
        }

        if self.presentation.dismiss_overlay() {
            self.sink.emit(&HostEvent::OverlayDismissed);
        }

        if self.ready.is_ready() {
            debug!("Retry: session already ready, nothing to reload");
            return;
        }

        let old = self.bridge.discard(&mut self.webview);
        let new = self.load_surface();
        if let Some(old) = old {
            self.presentation.replace_surface(old, new);
        }
        info!("Retry: reloaded as {} ({} command(s) still queued)", new, self.queue.len());
    }

    // ── Presentation ──────────────────────────────────────────

    /// Mount the surface into a host container.
    ///
    /// Only one container at a time; detach first to move it.  If the host is
    /// offline, or a placeholder was up when the surface was last detached,
    /// the placeholder is shown immediately.
    pub fn attach(&mut self, kind: ContainerKind, container: V::Container) -> Result<()> {
        if self.torn_down {
            return Err(HostError::TornDown);
        }
        let Some(surface) = self.bridge.current() else {
            return Err(HostError::TornDown);
        };
        self.presentation.attach(surface, kind, container)?;
        self.sink.emit(&HostEvent::Attached(kind));
        if !self.monitor.state().is_online() {
            self.show_overlay_if_mounted();
        }
        Ok(())
    }

    pub fn attach_modal(&mut self, container: V::Container) -> Result<()> {
        self.attach(ContainerKind::Modal, container)
    }

    pub fn attach_pushed(&mut self, container: V::Container) -> Result<()> {
        self.attach(ContainerKind::Pushed, container)
    }

    pub fn attach_inline(&mut self, container: V::Container) -> Result<()> {
        self.attach(ContainerKind::Inline, container)
    }

    /// Unmount the surface.  The session and any placeholder state persist;
    /// a placeholder comes back with the next attach and only retry removes
    /// it.
    pub fn detach(&mut self) -> Result<()> {
        if self.torn_down {
            return Err(HostError::TornDown);
        }
        match self.presentation.detach() {
            Some(_) => {
                self.sink.emit(&HostEvent::Detached);
                Ok(())
            }
            None => Err(HostError::NotAttached),
        }
    }

    /// The modal container's "done" action: close and tear down.
    pub fn dismiss_modal(&mut self) -> Result<()> {
        match self.presentation.attached_kind() {
            Some(ContainerKind::Modal) => {
                self.teardown();
                Ok(())
            }
            _ if self.torn_down => Err(HostError::TornDown),
            _ => Err(HostError::NotAttached),
        }
    }

    /// Route a navigation request from the surface through the link policy.
    pub fn decide_navigation(
        &mut self,
        action: &NavigationAction,
        opener: &mut impl LinkPort,
    ) -> NavigationDecision {
        if self.torn_down {
            return NavigationDecision::Cancel;
        }
        links::decide(&self.config.links, action, opener)
    }

    pub fn on_keyboard_hidden(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(surface) = self.bridge.current() {
            self.webview.reset_scroll_offset(surface);
        }
    }

    // ── Teardown ──────────────────────────────────────────────

    /// Release everything.  The host is not reusable afterwards; late
    /// callbacks are ignored and commands are rejected.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.monitor.stop();
        if self.presentation.dismiss_overlay() {
            self.sink.emit(&HostEvent::OverlayDismissed);
        }
        if self.presentation.detach().is_some() {
            self.sink.emit(&HostEvent::Detached);
        }
        self.bridge.discard(&mut self.webview);

        let discarded = self.queue.clear();
        let stale = self.inbox.clear();
        if discarded > 0 {
            warn!("Teardown discarded {} undelivered command(s)", discarded);
        }
        debug!("Teardown dropped {} pending inbound event(s)", stale);
        info!("Host '{}' torn down", self.config.handle);
        self.sink.emit(&HostEvent::TornDown { discarded });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &HostConfiguration {
        &self.config
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.monitor.state()
    }

    pub fn is_overlay_shown(&self) -> bool {
        self.presentation.overlay().is_some()
    }

    pub fn queued_commands(&self) -> usize {
        self.queue.len()
    }

    pub fn current_surface(&self) -> Option<SurfaceId> {
        self.bridge.current()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            surface: self.bridge.current(),
            ready: self.ready,
            connectivity: self.monitor.state(),
            overlay_shown: self.is_overlay_shown(),
            attached: self.presentation.attached_kind(),
            queued_commands: self.queue.len(),
            torn_down: self.torn_down,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn load_surface(&mut self) -> SurfaceId {
        self.ready = ReadyState::NotReady;
        let request = LoadRequest::for_config(&self.config);
        let id = self.bridge.load(&mut self.webview, &request);
        self.sink.emit(&HostEvent::SurfaceLoading(id));
        id
    }

    fn submit(&mut self, label: &'static str, script: String) {
        if self.ready.is_ready() {
            self.bridge.execute(&mut self.webview, label, &script);
        } else {
            self.queue.push(label, script);
            let depth = self.queue.len();
            debug!("Queued '{}' (depth {})", label, depth);
            self.sink.emit(&HostEvent::CommandQueued { label, depth });
        }
    }

    fn drop_command(&mut self, label: &'static str, reason: &dyn core::fmt::Display) {
        warn!("Dropping '{}': {}", label, reason);
        self.sink.emit(&HostEvent::CommandDropped {
            label,
            reason: reason.to_string(),
        });
    }

    fn apply_connectivity(&mut self, state: ConnectivityState) {
        self.sink.emit(&HostEvent::ConnectivityChanged(state));
        if !state.is_online() {
            self.show_overlay_if_mounted();
        }
    }

    fn show_overlay_if_mounted(&mut self) {
        if self.presentation.show_overlay() {
            self.sink.emit(&HostEvent::OverlayShown);
        }
    }
}

impl<W, R, V, S> Drop for EmbedLifecycle<W, R, V, S>
where
    W: WebViewPort,
    R: ReachabilityPort,
    V: ViewPort,
    S: EventSink,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
