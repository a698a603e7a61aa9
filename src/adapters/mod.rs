//! Adapters: concrete implementations of the port traits that do not
//! depend on a particular platform.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `log_sink`     | EventSink          | `log` facade                 |
//! | `reachability` | ReachabilityPort   | Host-owned network signal    |
//!
//! Web engine, view hierarchy and link dispatch adapters live in the host
//! application, since they are specific to its UI toolkit.

pub mod log_sink;
pub mod reachability;
