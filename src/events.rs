//! Inbound event marshalling.
//!
//! Platform callbacks (reachability edges, web-engine messages, script
//! results, UI actions) may fire on any thread.  They are never allowed to
//! touch lifecycle state directly; instead they post an [`InboundEvent`]
//! that the owner context drains with
//! [`EmbedLifecycle::pump`](crate::app::lifecycle::EmbedLifecycle::pump).
//!
//! ```text
//! ┌───────────────────┐     ┌──────────────────────────┐     ┌──────────────────┐
//! │ reachability cb   │────▶│ latest sample   (latch)  │     │                  │
//! │ ready message     │────▶│ newest ready id (latch)  │     │                  │
//! │ load/retry/keys   │────▶│ control  (lock-free, 64) │────▶│  EmbedLifecycle  │
//! │ script result cb  │────▶│ outcomes (lock-free, 64) │     │  (owner context) │
//! └───────────────────┘     └──────────────────────────┘     └──────────────────┘
//! ```
//!
//! Reachability and readiness are state, not history: only the latest sample
//! and the newest ready surface matter, so they are held in atomics and can
//! never be lost to a full queue.  Script outcomes are log-only and travel in
//! their own queue so a burst of them cannot crowd out control events.
//!
//! Drain order: ready, reachability, control events, outcomes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use heapless::mpmc::MpMcQueue;
use log::{error, warn};

use crate::bridge::{InboundMessage, ScriptOutcome};
use crate::config::READY_MESSAGE;
use crate::state::SurfaceId;

/// Capacity of each bounded lane.
/// Power of 2, as required by the queue.
pub const INBOX_CAPACITY: usize = 64;

/// Everything the platform can report back to the lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// The content posted a named message.  The ready handshake is latched
    /// and comes back out as [`InboundEvent::Ready`].
    Message(InboundMessage),
    /// The content on `surface` signalled it is ready.
    Ready(SurfaceId),
    /// Raw reachability sample from the signal source.
    Reachability(bool),
    /// The surface could not load its content.
    LoadFailed { surface: SurfaceId, reason: String },
    /// An evaluated script finished.
    ScriptCompleted { surface: SurfaceId, outcome: ScriptOutcome },
    /// The placeholder's retry affordance was used.
    RetryRequested,
    /// The on-screen keyboard was dismissed.
    KeyboardHidden,
}

type Lane = MpMcQueue<InboundEvent, INBOX_CAPACITY>;

const NO_SAMPLE: u8 = 0;
const UNREACHABLE: u8 = 1;
const REACHABLE: u8 = 2;
const NO_READY: u32 = 0;

struct Inbox {
    reachability: AtomicU8,
    ready: AtomicU32,
    control: Lane,
    outcomes: Lane,
}

impl Inbox {
    fn new() -> Self {
        Self {
            reachability: AtomicU8::new(NO_SAMPLE),
            ready: AtomicU32::new(NO_READY),
            control: Lane::new(),
            outcomes: Lane::new(),
        }
    }
}

/// Owner side of the inbound queue.
pub struct EventQueue {
    inbox: Arc<Inbox>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            inbox: Arc::new(Inbox::new()),
        }
    }

    /// A cloneable handle adapters use to post events.
    pub fn sender(&self) -> EventSender {
        EventSender {
            inbox: Arc::clone(&self.inbox),
        }
    }

    /// Take the next event in drain order, if any.
    pub fn pop(&self) -> Option<InboundEvent> {
        let ready = self.inbox.ready.swap(NO_READY, Ordering::AcqRel);
        if ready != NO_READY {
            return Some(InboundEvent::Ready(SurfaceId::new(ready)));
        }
        match self.inbox.reachability.swap(NO_SAMPLE, Ordering::AcqRel) {
            UNREACHABLE => return Some(InboundEvent::Reachability(false)),
            REACHABLE => return Some(InboundEvent::Reachability(true)),
            _ => {}
        }
        self.inbox
            .control
            .dequeue()
            .or_else(|| self.inbox.outcomes.dequeue())
    }

    /// Discard everything pending.  Returns how many events were dropped.
    pub fn clear(&self) -> usize {
        let mut n = 0;
        while self.pop().is_some() {
            n += 1;
        }
        n
    }
}

/// Producer handle; safe to move to other threads.
#[derive(Clone)]
pub struct EventSender {
    inbox: Arc<Inbox>,
}

impl EventSender {
    /// Post an event.  Returns `false` if its lane was full and the event
    /// was dropped.  Reachability samples and ready signals always succeed.
    pub fn post(&self, event: InboundEvent) -> bool {
        match event {
            InboundEvent::Reachability(reachable) => {
                let raw = if reachable { REACHABLE } else { UNREACHABLE };
                self.inbox.reachability.store(raw, Ordering::Release);
                true
            }
            InboundEvent::Ready(surface) => self.latch_ready(surface),
            InboundEvent::Message(ref message) if message.name == READY_MESSAGE => {
                self.latch_ready(message.surface)
            }
            InboundEvent::ScriptCompleted { .. } => match self.inbox.outcomes.enqueue(event) {
                Ok(()) => true,
                Err(dropped) => {
                    warn!("Outcome queue full, dropped {:?}", dropped);
                    false
                }
            },
            _ => match self.inbox.control.enqueue(event) {
                Ok(()) => true,
                Err(dropped) => {
                    error!("Inbound queue full, dropped {:?}", dropped);
                    false
                }
            },
        }
    }

    /// Surface ids only grow, so keeping the maximum means a late ready from
    /// a discarded surface can never shadow the live one.
    fn latch_ready(&self, surface: SurfaceId) -> bool {
        self.inbox.ready.fetch_max(surface.get(), Ordering::AcqRel);
        true
    }
}

impl core::fmt::Debug for EventSender {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventSender").finish_non_exhaustive()
    }
}
