//! Content bridge: the one-way instruction channel to the surface.
//!
//! Outbound, the bridge owns the identity of the live surface and evaluates
//! already-serialized scripts against it.  Inbound, it recognises the ready
//! handshake and filters out anything coming from a surface that is no
//! longer current.
//!
//! ```text
//!  EmbedLifecycle ──script──▶ ContentBridge ──evaluate──▶ WebViewPort
//!        ▲                                                    │
//!        └──── ready(SurfaceId) ◀── recognise ◀── message ────┘
//! ```
//!
//! Nothing here waits for a result.  Script outcomes arrive later as events
//! and are only logged.

pub mod codec;

use log::{debug, info, warn};
use serde_json::Value;

use crate::app::ports::WebViewPort;
use crate::config::{HostConfiguration, READY_MESSAGE};
use crate::state::SurfaceId;

/// What the web engine is asked to load for a new surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub url: String,
    pub timeout_secs: u32,
    /// Inbound message names the adapter must register handlers for.
    pub message_handlers: &'static [&'static str],
}

impl LoadRequest {
    pub fn for_config(config: &HostConfiguration) -> Self {
        Self {
            url: config.routing_url(),
            timeout_secs: config.request_timeout_secs,
            message_handlers: &[READY_MESSAGE],
        }
    }
}

/// A message the content posted to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub surface: SurfaceId,
    pub name: String,
    pub body: Value,
}

/// Result of an asynchronous script evaluation, as reported by the engine.
pub type ScriptOutcome = Result<Option<Value>, String>;

pub struct ContentBridge {
    current: Option<SurfaceId>,
    next_id: SurfaceId,
}

impl Default for ContentBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentBridge {
    pub fn new() -> Self {
        Self {
            current: None,
            next_id: SurfaceId::FIRST,
        }
    }

    /// Create a fresh surface and start loading it.  Any previous surface
    /// must have been discarded first.
    pub fn load(&mut self, webview: &mut impl WebViewPort, request: &LoadRequest) -> SurfaceId {
        debug_assert!(self.current.is_none(), "load over a live surface");
        let id = self.next_id;
        self.next_id = id.next();
        info!("Bridge: loading {} from {}", id, request.url);
        webview.create_surface(id, request);
        self.current = Some(id);
        id
    }

    /// Destroy the current surface, if any.
    pub fn discard(&mut self, webview: &mut impl WebViewPort) -> Option<SurfaceId> {
        let id = self.current.take()?;
        info!("Bridge: discarding {}", id);
        webview.destroy_surface(id);
        Some(id)
    }

    pub fn current(&self) -> Option<SurfaceId> {
        self.current
    }

    /// Whether `surface` is the live instance.
    pub fn is_current(&self, surface: SurfaceId) -> bool {
        self.current == Some(surface)
    }

    /// Hand a script to the live surface.  Returns `false` if there is none.
    pub fn execute(&self, webview: &mut impl WebViewPort, label: &str, script: &str) -> bool {
        let Some(id) = self.current else {
            warn!("Bridge: no surface for '{}', dropped", label);
            return false;
        };
        debug!("Bridge: {} <- {}", id, label);
        webview.evaluate_script(id, script);
        true
    }

    /// Returns the surface id if `message` is the ready handshake from the
    /// live surface.
    pub fn recognize_ready(&self, message: &InboundMessage) -> Option<SurfaceId> {
        if message.name != READY_MESSAGE {
            debug!("Bridge: ignoring message '{}' from {}", message.name, message.surface);
            return None;
        }
        if !self.is_current(message.surface) {
            debug!("Bridge: stale ready from {}", message.surface);
            return None;
        }
        Some(message.surface)
    }

    /// Log a script outcome.  Returns the error text for failures from the
    /// live surface so the caller can report it.
    pub fn observe_outcome(&self, surface: SurfaceId, outcome: &ScriptOutcome) -> Option<String> {
        if !self.is_current(surface) {
            debug!("Bridge: outcome from stale {} ignored", surface);
            return None;
        }
        match outcome {
            Ok(Some(value)) => {
                debug!("Bridge: {} result {}", surface, value);
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Bridge: script failed on {}: {}", surface, e);
                Some(e.clone())
            }
        }
    }
}
