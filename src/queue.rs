//! Pending command buffer.
//!
//! Commands issued before the content surface is ready are held here in
//! insertion order and handed back in one pass when the ready signal arrives.
//!
//! ```text
//!  issue ──▶ [ c1 | c2 | c3 ... ] ──take_all()──▶ bridge (FIFO)
//! ```
//!
//! There is no capacity limit: the queue grows with whatever the host issues
//! before readiness.  Hosts that can issue large volumes of commands while
//! offline should keep that in mind, since nothing is evicted.

use std::collections::VecDeque;

/// One already-serialized instruction awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    /// Insertion sequence number (monotonic per queue).
    pub seq: u64,
    /// Short command name for logs.
    pub label: &'static str,
    /// Script text exactly as it will be evaluated.
    pub script: String,
}

#[derive(Debug, Default)]
pub struct CommandQueue {
    items: VecDeque<PendingCommand>,
    next_seq: u64,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.  Returns its sequence number.
    pub fn push(&mut self, label: &'static str, script: String) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push_back(PendingCommand { seq, label, script });
        seq
    }

    /// Remove every pending command at once, oldest first.
    ///
    /// The queue is empty when this returns, so a flush can never leave a
    /// partially drained queue behind.
    pub fn take_all(&mut self) -> Vec<PendingCommand> {
        Vec::from(std::mem::take(&mut self.items))
    }

    /// Drop everything without delivering it.  Returns how many were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.items.len();
        self.items.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
