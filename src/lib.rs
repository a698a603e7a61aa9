//! Embed host library.
//!
//! Hosts a remotely served support widget inside a native web surface and
//! exposes a small fire-and-forget command API that works whether or not the
//! widget has loaded and whether or not the device is online.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │   web engine   view hierarchy   reachability   link dispatch   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              EmbedLifecycle (pure logic)               │    │
//! │  │  ContentBridge · CommandQueue · ConnectivityMonitor    │    │
//! │  │  PresentationAdapter                                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bridge;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod events;
pub mod links;
pub mod presentation;
pub mod queue;
pub mod state;

pub use app::commands::{HostCommand, ResetOptions};
pub use app::events::HostEvent;
pub use app::lifecycle::EmbedLifecycle;
pub use config::{HostConfiguration, LinkPolicy};
pub use error::{CodecError, HostError};
pub use events::{EventSender, InboundEvent};
pub use presentation::ContainerKind;
pub use state::{ConnectivityState, ReadyState, SurfaceId};
