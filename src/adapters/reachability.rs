//! Host-driven reachability adapter.
//!
//! Implements [`ReachabilityPort`] for host applications that already own a
//! network-status signal (platform path monitor, their own HTTP client,
//! etc.).  The host keeps a [`ReachabilitySwitch`] and flips it; the adapter
//! forwards each change to the lifecycle's notifier.
//!
//! The switch is `Send + Sync`, so it can be driven from the platform's
//! callback thread.

use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use crate::app::ports::{ReachabilityNotifier, ReachabilityPort};

#[derive(Default)]
struct Shared {
    reachable: bool,
    notifier: Option<ReachabilityNotifier>,
    started: bool,
}

/// Reachability source driven by the host.
pub struct ManualReachability {
    shared: Arc<Mutex<Shared>>,
}

/// Control handle for a [`ManualReachability`].
#[derive(Clone)]
pub struct ReachabilitySwitch {
    shared: Arc<Mutex<Shared>>,
}

impl ManualReachability {
    /// Create the source with an initial sample and its control handle.
    pub fn new(initially_reachable: bool) -> (Self, ReachabilitySwitch) {
        let shared = Arc::new(Mutex::new(Shared {
            reachable: initially_reachable,
            ..Shared::default()
        }));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            ReachabilitySwitch { shared },
        )
    }
}

impl ReachabilityPort for ManualReachability {
    fn start(&mut self, notifier: ReachabilityNotifier) -> anyhow::Result<()> {
        let mut shared = self.shared.lock().map_err(|_| anyhow::anyhow!("reachability state poisoned"))?;
        if shared.started {
            anyhow::bail!("reachability source already started");
        }
        shared.notifier = Some(notifier);
        shared.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.notifier = None;
    }

    fn is_reachable(&self) -> bool {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reachable
    }
}

impl ReachabilitySwitch {
    /// Record a new sample and notify if it changed.
    pub fn set_reachable(&self, reachable: bool) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if shared.reachable == reachable {
            return;
        }
        shared.reachable = reachable;
        match shared.notifier.as_ref() {
            Some(notify) => notify(reachable),
            None => debug!("Reachability change before start/after stop"),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reachable
    }
}
