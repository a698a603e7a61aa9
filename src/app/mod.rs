//! Application core: lifecycle logic, zero platform I/O.
//!
//! The orchestrator and its vocabulary: the commands the host issues, the
//! events it observes, and the **port traits** every platform interaction
//! goes through.  See [`lifecycle`] for the state machine.

pub mod commands;
pub mod events;
pub mod lifecycle;
pub mod ports;
