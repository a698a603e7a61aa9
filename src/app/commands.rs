//! Commands the host application issues to the embedded content.
//!
//! The set is fixed; arbitrary script cannot be sent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::bridge::codec;
use crate::error::CodecError;

/// Options for [`HostCommand::Reset`].  Unset fields are omitted from the
/// payload so the content keeps its current values for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_fields: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_chat_history: Option<bool>,
}

/// A fire-and-forget instruction for the content surface.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Push metadata fields to the conversation.
    SetMetaFields(Map<String, Value>),
    /// Restart the conversation, optionally changing language/greeting/metadata.
    Reset(ResetOptions),
    /// Erase the stored chat history.
    DeleteHistory,
}

impl HostCommand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SetMetaFields(_) => "setMetaFields",
            Self::Reset(_) => "reset",
            Self::DeleteHistory => "deleteHistory",
        }
    }

    /// Serialize into the exact script the surface will evaluate.
    pub fn to_script(&self) -> Result<String, CodecError> {
        match self {
            Self::SetMetaFields(fields) => codec::set_meta_fields_script(fields),
            Self::Reset(options) => codec::reset_script(options),
            Self::DeleteHistory => Ok(codec::delete_history_script()),
        }
    }
}
