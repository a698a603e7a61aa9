//! Connectivity monitor.
//!
//! Wraps a push-based [`ReachabilityPort`] and turns its raw samples into
//! edge-triggered [`ConnectivityState`] transitions.  Repeated samples with
//! the same value are swallowed.
//!
//! The monitor registers a notifier that posts into the lifecycle's inbound
//! queue.  Registration is represented by an owned [`Subscription`]; once it
//! is cancelled the notifier becomes inert, so a source that keeps firing
//! after `stop()` cannot reach a torn-down host.
//!
//! ## Load failures
//!
//! A content-load failure is also recorded as `Offline`, but no reachability
//! edge is guaranteed to follow it.  The monitor remembers that the current
//! `Offline` came from a load failure so [`refresh`](ConnectivityMonitor::refresh)
//! can re-sample the source when the user retries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use crate::app::ports::ReachabilityPort;
use crate::error::HostError;
use crate::events::{EventSender, InboundEvent};
use crate::state::ConnectivityState;

/// Handle for the notifier registration.  Dropping it does not cancel;
/// call [`cancel`](Self::cancel).
#[derive(Debug)]
pub struct Subscription {
    active: Arc<AtomicBool>,
}

impl Subscription {
    fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Why the monitor currently reports `Offline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OfflineCause {
    Signal,
    LoadFailure,
}

pub struct ConnectivityMonitor<R: ReachabilityPort> {
    source: R,
    state: ConnectivityState,
    offline_cause: Option<OfflineCause>,
    subscription: Option<Subscription>,
}

impl<R: ReachabilityPort> ConnectivityMonitor<R> {
    /// Take the first sample and register for edges.
    ///
    /// Failure to start the source is fatal for the host.
    pub fn start(mut source: R, sender: EventSender) -> Result<Self, HostError> {
        let subscription = Subscription::new();
        let active = Arc::clone(&subscription.active);
        let notifier = Box::new(move |reachable: bool| {
            if active.load(Ordering::Acquire) {
                sender.post(InboundEvent::Reachability(reachable));
            }
        });

        source.start(notifier).map_err(HostError::Connectivity)?;

        let state = ConnectivityState::from_reachable(source.is_reachable());
        info!("Connectivity: monitor started, initially {:?}", state);
        Ok(Self {
            source,
            state,
            offline_cause: (!state.is_online()).then_some(OfflineCause::Signal),
            subscription: Some(subscription),
        })
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Record a state reported by the signal source.  Returns the new state
    /// on a transition, `None` if nothing changed.
    pub fn record(&mut self, state: ConnectivityState) -> Option<ConnectivityState> {
        self.offline_cause = (!state.is_online()).then_some(OfflineCause::Signal);
        self.transition(state)
    }

    /// Record that the content failed to load.
    pub fn record_load_failure(&mut self) -> Option<ConnectivityState> {
        self.offline_cause = Some(OfflineCause::LoadFailure);
        self.transition(ConnectivityState::Offline)
    }

    /// Re-sample the source if the current `Offline` came from a load
    /// failure.  An `Offline` reported by the signal itself is trusted until
    /// the next edge.
    pub fn refresh(&mut self) -> Option<ConnectivityState> {
        if self.offline_cause != Some(OfflineCause::LoadFailure) {
            return None;
        }
        if self.source.is_reachable() {
            debug!("Connectivity: source reachable after load failure");
            self.offline_cause = None;
            self.transition(ConnectivityState::Online)
        } else {
            None
        }
    }

    /// Cancel the registration and stop the source.  Idempotent.
    pub fn stop(&mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.cancel();
            self.source.stop();
            info!("Connectivity: monitor stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    fn transition(&mut self, state: ConnectivityState) -> Option<ConnectivityState> {
        if state == self.state {
            return None;
        }
        info!("Connectivity: {:?} -> {:?}", self.state, state);
        self.state = state;
        Some(state)
    }
}
