//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each host event as one structured
//! line through the `log` facade.  Whatever logger the host application
//! installs decides where it ends up.

use log::{info, warn};

use crate::app::events::HostEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`HostEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &HostEvent) {
        match event {
            HostEvent::SurfaceLoading(id) => info!("LOAD  | surface={}", id),
            HostEvent::Ready(id) => info!("READY | surface={}", id),
            HostEvent::CommandQueued { label, depth } => {
                info!("QUEUE | cmd={} depth={}", label, depth);
            }
            HostEvent::QueueFlushed { count } => info!("FLUSH | count={}", count),
            HostEvent::CommandDropped { label, reason } => {
                warn!("DROP  | cmd={} reason={}", label, reason);
            }
            HostEvent::ConnectivityChanged(state) => info!("NET   | state={:?}", state),
            HostEvent::LoadFailed { surface, reason } => {
                warn!("LOAD  | surface={} failed: {}", surface, reason);
            }
            HostEvent::ScriptFailed { surface, error } => {
                warn!("EVAL  | surface={} error: {}", surface, error);
            }
            HostEvent::OverlayShown => info!("VIEW  | offline overlay shown"),
            HostEvent::OverlayDismissed => info!("VIEW  | offline overlay dismissed"),
            HostEvent::Attached(kind) => info!("VIEW  | attached as {:?}", kind),
            HostEvent::Detached => info!("VIEW  | detached"),
            HostEvent::TornDown { discarded } => {
                info!("DOWN  | discarded_commands={}", discarded);
            }
        }
    }
}
