//! Port traits: the boundary between the lifecycle and the platform.
//!
//! ```text
//!   Platform adapter ──▶ Port trait ──▶ EmbedLifecycle (domain)
//! ```
//!
//! The web engine, reachability source, view hierarchy and link dispatcher
//! are all platform concerns.  The [`EmbedLifecycle`](super::lifecycle::EmbedLifecycle)
//! consumes them via generics, so the state machine is testable with
//! recording mocks.
//!
//! ## Threading
//!
//! Port methods are only ever called from the lifecycle's owner context.
//! Anything the platform reports back (ready messages, script results,
//! reachability edges) must be posted through an
//! [`EventSender`](crate::events::EventSender) rather than calling into the
//! lifecycle from a foreign thread.

use crate::bridge::LoadRequest;
use crate::presentation::ContainerKind;
use crate::state::SurfaceId;

// ───────────────────────────────────────────────────────────────
// Web engine port (domain → content surface)
// ───────────────────────────────────────────────────────────────

/// Creates, drives and destroys content-surface instances.
pub trait WebViewPort {
    /// Create a new surface and start loading `request`.
    ///
    /// The adapter must register a handler for each name in
    /// `request.message_handlers` and post inbound messages tagged with `id`.
    /// A load failure is reported by posting
    /// [`InboundEvent::LoadFailed`](crate::events::InboundEvent::LoadFailed).
    fn create_surface(&mut self, id: SurfaceId, request: &LoadRequest);

    /// Release the surface.  Callbacks still in flight for `id` are ignored
    /// by the lifecycle.
    fn destroy_surface(&mut self, id: SurfaceId);

    /// Evaluate `script` asynchronously.  The result, if the adapter observes
    /// one, is posted back as
    /// [`InboundEvent::ScriptCompleted`](crate::events::InboundEvent::ScriptCompleted).
    fn evaluate_script(&mut self, id: SurfaceId, script: &str);

    /// Scroll the surface back to its origin.
    fn reset_scroll_offset(&mut self, _id: SurfaceId) {}
}

// ───────────────────────────────────────────────────────────────
// Reachability port (platform → domain)
// ───────────────────────────────────────────────────────────────

/// Callback handed to the reachability source.  Called with `true` when the
/// network becomes reachable and `false` when it becomes unreachable.
pub type ReachabilityNotifier = Box<dyn Fn(bool) + Send + 'static>;

/// A push-based reachable/unreachable signal.
pub trait ReachabilityPort {
    /// Begin delivering edges to `notifier`.
    ///
    /// An error here means the host cannot guarantee connectivity awareness
    /// and construction fails.
    fn start(&mut self, notifier: ReachabilityNotifier) -> anyhow::Result<()>;

    /// Stop delivering edges and drop the notifier.
    fn stop(&mut self);

    /// Current sample of the signal.
    fn is_reachable(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// View port (domain → host view hierarchy)
// ───────────────────────────────────────────────────────────────

/// Mounts the surface and the offline placeholder into host containers.
pub trait ViewPort {
    /// Host-side container handle (presentation context, navigation stack,
    /// parent view …).
    type Container;

    /// Place the surface into `container`, presented as `kind`.
    fn attach(
        &mut self,
        surface: SurfaceId,
        kind: ContainerKind,
        container: Self::Container,
    ) -> anyhow::Result<()>;

    /// Remove the surface from whatever container holds it.
    fn detach(&mut self, surface: SurfaceId);

    /// Swap a recreated surface into the container that held `old`.
    fn replace_surface(&mut self, old: SurfaceId, new: SurfaceId);

    /// Cover the surface with the offline placeholder.
    fn show_offline_overlay(&mut self, surface: SurfaceId);

    /// Remove the offline placeholder.
    fn hide_offline_overlay(&mut self, surface: SurfaceId);
}

// ───────────────────────────────────────────────────────────────
// Link port (domain → other apps / in-app browser)
// ───────────────────────────────────────────────────────────────

/// Dispatches URLs the content asked to open.
pub trait LinkPort {
    /// Whether any installed handler can open `url`.
    fn can_open(&self, url: &str) -> bool;

    /// Hand `url` to the system (browser, mail client …).
    fn open_external(&mut self, url: &str);

    /// Show `url` in an in-app browser.
    fn open_in_app(&mut self, url: &str);

    /// Route a deep link back into the host application.
    fn open_app_link(&mut self, url: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// Receives structured [`HostEvent`](super::events::HostEvent)s.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::HostEvent);
}
