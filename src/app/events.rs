//! Outbound host events.
//!
//! The [`EmbedLifecycle`](super::lifecycle::EmbedLifecycle) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters decide
//! what to do with them: log them, forward them to analytics, drive UI.

use crate::presentation::ContainerKind;
use crate::state::{ConnectivityState, SurfaceId};

/// Structured events emitted by the lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A surface instance was created and started loading.
    SurfaceLoading(SurfaceId),

    /// The surface posted its ready handshake and was initialized.
    Ready(SurfaceId),

    /// A command was parked until the surface becomes ready.
    CommandQueued { label: &'static str, depth: usize },

    /// The pending queue was delivered.
    QueueFlushed { count: usize },

    /// A command could not be serialized and was dropped.
    CommandDropped { label: &'static str, reason: String },

    /// The monitor recorded a connectivity transition.
    ConnectivityChanged(ConnectivityState),

    /// The surface failed to load.
    LoadFailed { surface: SurfaceId, reason: String },

    /// The content reported a script error.
    ScriptFailed { surface: SurfaceId, error: String },

    OverlayShown,
    OverlayDismissed,

    Attached(ContainerKind),
    Detached,

    /// Teardown completed; `discarded` queued commands were never delivered.
    TornDown { discarded: usize },
}
