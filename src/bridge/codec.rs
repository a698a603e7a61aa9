//! Script-channel codec.
//!
//! The content surface accepts a single string per instruction, so every
//! structured payload is JSON-encoded, then base64-encoded, then embedded as
//! the quoted argument of a named operation:
//!
//! ```text
//! ┌───────────────────┐   serde_json   ┌──────┐  base64  ┌──────────────────────────┐
//! │ payload (Serialize)│ ─────────────▶ │ JSON │ ───────▶ │ initializeEmbed('eyJo…'); │
//! └───────────────────┘                └──────┘          └──────────────────────────┘
//! ```
//!
//! The standard base64 alphabet (`A–Z a–z 0–9 + / =`) never contains a quote
//! or backslash, so the argument needs no further escaping.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::app::commands::ResetOptions;
use crate::config::HostConfiguration;
use crate::error::CodecError;

pub const INITIALIZE_FN: &str = "initializeEmbed";
pub const SET_META_FIELDS_FN: &str = "setMetaFields";
pub const RESET_FN: &str = "adaEmbed.reset";
pub const DELETE_HISTORY_FN: &str = "adaEmbed.deleteHistory";

/// Body of the implicit initialize instruction.
#[derive(Debug, Serialize)]
pub struct InitializePayload<'a> {
    pub handle: &'a str,
    pub cluster: &'a str,
    pub language: &'a str,
    pub styles: &'a str,
    pub greeting: &'a str,
}

impl<'a> From<&'a HostConfiguration> for InitializePayload<'a> {
    fn from(c: &'a HostConfiguration) -> Self {
        Self {
            handle: &c.handle,
            cluster: &c.cluster,
            language: &c.language,
            styles: &c.styles,
            greeting: &c.greeting,
        }
    }
}

/// JSON-encode then base64-encode a payload.
pub fn encode_payload<T: Serialize + ?Sized>(payload: &T) -> Result<String, CodecError> {
    let json = serde_json::to_vec(payload).map_err(CodecError::Serialize)?;
    Ok(STANDARD.encode(json))
}

/// Inverse of [`encode_payload`].
pub fn decode_payload(encoded: &str) -> Result<Value, CodecError> {
    let bytes = STANDARD.decode(encoded)?;
    serde_json::from_slice(&bytes).map_err(CodecError::Deserialize)
}

/// Convert arbitrary host metadata into a JSON object.
pub fn to_meta_object<T: Serialize + ?Sized>(fields: &T) -> Result<Map<String, Value>, CodecError> {
    match serde_json::to_value(fields).map_err(CodecError::Serialize)? {
        Value::Object(map) => Ok(map),
        _ => Err(CodecError::NotAnObject),
    }
}

fn call_with_payload<T: Serialize + ?Sized>(function: &str, payload: &T) -> Result<String, CodecError> {
    Ok(format!("{function}('{}');", encode_payload(payload)?))
}

pub fn initialize_script(config: &HostConfiguration) -> Result<String, CodecError> {
    call_with_payload(INITIALIZE_FN, &InitializePayload::from(config))
}

pub fn set_meta_fields_script<T: Serialize + ?Sized>(fields: &T) -> Result<String, CodecError> {
    call_with_payload(SET_META_FIELDS_FN, fields)
}

pub fn reset_script(options: &ResetOptions) -> Result<String, CodecError> {
    call_with_payload(RESET_FN, options)
}

pub fn delete_history_script() -> String {
    format!("{DELETE_HISTORY_FN}();")
}

/// Split `name('arg');` or `name();` into its parts.  Used by diagnostics
/// and by adapters that forward instructions over something other than a
/// script engine.
pub fn parse_script(script: &str) -> Option<(&str, Option<&str>)> {
    let body = script.strip_suffix(");")?;
    let (name, rest) = body.split_once('(')?;
    if rest.is_empty() {
        return Some((name, None));
    }
    let arg = rest.strip_prefix('\'')?.strip_suffix('\'')?;
    Some((name, Some(arg)))
}
