//! Typed builders for the console's token payloads.
//!
//! The client accepts any [`QueryPayload`]; these types only spell out the
//! field names the console backend binds, so callers don't have to.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value;

use crate::transport::QueryPayload;

pub trait IntoPayload {
    /// Serialize into a payload. Values that are not a JSON object have no
    /// field names to send and are rejected.
    fn into_payload(self) -> Result<QueryPayload, serde_json::Error>;
}

impl<S: Serialize> IntoPayload for S {
    fn into_payload(self) -> Result<QueryPayload, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde_json::Error::custom(format!(
                "payload must serialize to an object, got {}",
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Filter and paging for `list`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Descriptor for `create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewToken {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `yyyy-MM-dd HH:mm:ss`, as the console form sends it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<String>,
}

/// Identifies one token, for `delete_token` and `copy_curl`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRef {
    pub token_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Disabled,
    Enabled,
}

impl Serialize for TokenStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            TokenStatus::Disabled => 0,
            TokenStatus::Enabled => 1,
        })
    }
}

/// Payload for `update_token_status`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatusUpdate {
    pub token_id: i64,
    pub status: TokenStatus,
}
