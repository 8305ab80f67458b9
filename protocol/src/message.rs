//! Message content payloads, decoded from an event's raw JSON by `msgtype`.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// `msgtype` identifiers for the content kinds the timeline knows how to
/// render.
pub mod msgtype {
    pub const TEXT: &str = "m.text";
    pub const NOTICE: &str = "m.notice";
    pub const EMOTE: &str = "m.emote";
    pub const IMAGE: &str = "m.image";
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextContent {
    pub body: String,
    /// HTML-formatted alternative to `body`, when the sender supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NoticeContent {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmoteContent {
    pub body: String,
}

/// Intrinsic metadata of an image attachment. Everything is optional; the
/// sender may omit any of it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ImageInfo {
    #[serde(default, rename = "w", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, rename = "h", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImageContent {
    /// Filename or alt text for the attachment.
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ImageInfo>,
}

/// Closed union over the content kinds the pipeline dispatches on. Kinds the
/// pipeline does not understand decode to [`MessageContent::Unknown`] so that
/// classification stays total.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(TextContent),
    Notice(NoticeContent),
    Emote(EmoteContent),
    Image(ImageContent),
    Unknown { msgtype: String },
}

impl MessageContent {
    /// The `msgtype` tag this content decoded from, for diagnostics.
    pub fn type_tag(&self) -> &str {
        match self {
            MessageContent::Text(_) => msgtype::TEXT,
            MessageContent::Notice(_) => msgtype::NOTICE,
            MessageContent::Emote(_) => msgtype::EMOTE,
            MessageContent::Image(_) => msgtype::IMAGE,
            MessageContent::Unknown { msgtype } => msgtype,
        }
    }
}

/// Decodes a raw event content object into a typed payload.
///
/// Returns `None` only when the content has no `msgtype` string at all.
/// A recognized tag whose fields fail to decode, or an unrecognized tag,
/// yields [`MessageContent::Unknown`] — "no known shape" is data here, not
/// an error.
pub fn decode_message_content(content: &Value) -> Option<MessageContent> {
    let tag = content.get("msgtype").and_then(Value::as_str)?;
    let decoded = match tag {
        msgtype::TEXT => serde_json::from_value(content.clone())
            .ok()
            .map(MessageContent::Text),
        msgtype::NOTICE => serde_json::from_value(content.clone())
            .ok()
            .map(MessageContent::Notice),
        msgtype::EMOTE => serde_json::from_value(content.clone())
            .ok()
            .map(MessageContent::Emote),
        msgtype::IMAGE => serde_json::from_value(content.clone())
            .ok()
            .map(MessageContent::Image),
        _ => None,
    };
    Some(decoded.unwrap_or_else(|| MessageContent::Unknown {
        msgtype: tag.to_string(),
    }))
}
