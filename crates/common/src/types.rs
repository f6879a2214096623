//! Canonical inbound message, produced by the channel normalizer and
//! consumed by the dialogue engine.

use serde::{Deserialize, Serialize};

/// What kind of payload a message carried.
///
/// Only `Text` bodies are meaningful downstream; everything else (images,
/// audio, reactions, ...) normalizes to `Other` and is ignored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Other,
}

/// A provider-independent inbound message.
///
/// Constructed per webhook event and never stored beyond its processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Stable sender identifier (the sender's phone number on WhatsApp).
    pub sender_id: String,
    /// Profile name from the provider's contacts block, when present.
    pub display_name: Option<String>,
    pub kind: MessageKind,
    pub body: String,
}

impl InboundMessage {
    /// Convenience constructor for a plain text message.
    pub fn text(sender_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            display_name: None,
            kind: MessageKind::Text,
            body: body.into(),
        }
    }
}
