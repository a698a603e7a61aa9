//! Unified error types for the embed host.
//!
//! Only two kinds of failure ever reach the host application as values:
//! construction failures (fatal) and caller errors such as issuing a command
//! after teardown.  Everything else is absorbed by the lifecycle and shows up
//! in logs or as observable state.

use core::fmt;

use crate::presentation::ContainerKind;

// ---------------------------------------------------------------------------
// Top-level host error
// ---------------------------------------------------------------------------

/// Errors returned by [`EmbedLifecycle`](crate::app::lifecycle::EmbedLifecycle).
#[derive(Debug)]
pub enum HostError {
    /// The supplied configuration failed validation.
    InvalidConfig(&'static str),
    /// The reachability source could not be started.  Fatal at construction.
    Connectivity(anyhow::Error),
    /// The host container refused the surface.
    Presentation(anyhow::Error),
    /// The surface is already mounted in a container of this kind.
    AlreadyAttached(ContainerKind),
    /// The operation needs a mounted surface and there is none.
    NotAttached,
    /// The host was torn down and is not reusable.
    TornDown,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Connectivity(e) => write!(f, "connectivity monitor unavailable: {e}"),
            Self::Presentation(e) => write!(f, "presentation failed: {e}"),
            Self::AlreadyAttached(kind) => write!(f, "surface already attached ({kind:?})"),
            Self::NotAttached => write!(f, "surface is not attached to a container"),
            Self::TornDown => write!(f, "host has been torn down"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connectivity(e) | Self::Presentation(e) => Some(&**e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

/// A command payload could not be turned into (or read back from) its wire form.
#[derive(Debug)]
pub enum CodecError {
    /// serde_json refused the value (e.g. a map with non-string keys).
    Serialize(serde_json::Error),
    /// Metadata must serialize to a JSON object.
    NotAnObject,
    /// The encoded argument is not valid base64.
    Base64(base64::DecodeError),
    /// The decoded bytes are not a JSON document.
    Deserialize(serde_json::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(e) => write!(f, "payload not serializable: {e}"),
            Self::NotAnObject => write!(f, "payload must be a JSON object"),
            Self::Base64(e) => write!(f, "payload not valid base64: {e}"),
            Self::Deserialize(e) => write!(f, "payload not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(e) | Self::Deserialize(e) => Some(e),
            Self::Base64(e) => Some(e),
            Self::NotAnObject => None,
        }
    }
}

impl From<base64::DecodeError> for CodecError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Base64(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, HostError>;
