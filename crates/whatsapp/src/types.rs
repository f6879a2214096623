//! Serde model of the Cloud API webhook payload.
//!
//! Every substructure is optional or defaulted: delivery-status callbacks,
//! template updates, and partially shaped payloads must deserialize cleanly
//! and simply normalize to "no message".

use serde::Deserialize;

/// Top-level webhook body: `{ object, entry: [ { changes: [ ... ] } ] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Delivery/read receipts; present on status-only callbacks.
    #[serde(default)]
    pub statuses: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub display_phone_number: Option<String>,
    #[serde(default)]
    pub phone_number_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub wa_id: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub message_type: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: Option<String>,
}

impl Message {
    /// The text body, when this is a text message.
    pub fn text_body(&self) -> Option<&str> {
        if self.message_type.as_deref() != Some("text") {
            return None;
        }
        self.text.as_ref().and_then(|t| t.body.as_deref())
    }
}
