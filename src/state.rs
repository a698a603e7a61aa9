//! Composite lifecycle state.
//!
//! The lifecycle tracks two orthogonal axes plus the overlay:
//!
//! ```text
//!            ┌──────────── ReadyState ────────────┐
//!            │  NotReady ──[ready signal]──▶ Ready │   (once per surface)
//!            └────────────────────────────────────┘
//!            ┌───────── ConnectivityState ─────────┐
//!            │  Online ◀──[reachability edge]──▶ Offline
//!            └────────────────────────────────────┘
//!   OverlayPresence = OfflineOverlayHandle exists
//! ```
//!
//! Surface recreation is the only path back to `NotReady`.

use core::fmt;

use crate::presentation::ContainerKind;

// ---------------------------------------------------------------------------
// Surface identity
// ---------------------------------------------------------------------------

/// Generation number of a content-surface instance.
///
/// Every inbound callback carries the id of the surface that produced it, so
/// signals from a discarded or torn-down surface can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u32);

impl SurfaceId {
    pub const FIRST: Self = Self(1);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    NotReady,
    Ready,
}

impl ReadyState {
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable { Self::Online } else { Self::Offline }
    }

    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Point-in-time view of the lifecycle, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleSnapshot {
    /// Current surface; `None` only after teardown.
    pub surface: Option<SurfaceId>,
    pub ready: ReadyState,
    pub connectivity: ConnectivityState,
    pub overlay_shown: bool,
    pub attached: Option<ContainerKind>,
    pub queued_commands: usize,
    pub torn_down: bool,
}
