//! Provider payload → canonical [`InboundMessage`].

use khidmat_common::{InboundMessage, MessageKind};

use crate::types::WebhookPayload;

/// Normalize a webhook payload to at most one inbound message.
///
/// Returns `None` when the payload carries no user message (status-only
/// callbacks, non-`messages` changes, absent substructure) — that is the
/// normal quiet case, never an error. Non-text messages normalize to
/// [`MessageKind::Other`] with an empty body; the engine ignores them.
pub fn normalize(payload: &WebhookPayload) -> Option<InboundMessage> {
    for entry in &payload.entry {
        for change in &entry.changes {
            if let Some(field) = change.field.as_deref()
                && field != "messages"
            {
                continue;
            }
            let value = &change.value;
            let Some(msg) = value.messages.first() else {
                continue;
            };
            let sender_id = msg.from.clone()?;

            // Profile name for this sender, from the contacts block.
            let display_name = value
                .contacts
                .iter()
                .find(|c| c.wa_id.as_deref() == Some(sender_id.as_str()))
                .or_else(|| value.contacts.first())
                .and_then(|c| c.profile.as_ref())
                .and_then(|p| p.name.clone());

            let (kind, body) = match msg.text_body() {
                Some(text) => (MessageKind::Text, text.to_string()),
                None => (MessageKind::Other, String::new()),
            };

            return Some(InboundMessage {
                sender_id,
                display_name,
                kind,
                body,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn payload(json: &str) -> WebhookPayload {
        serde_json::from_str(json).unwrap()
    }

    fn message_payload(msg_type: &str, body: Option<&str>) -> WebhookPayload {
        let text = body
            .map(|b| format!(r#", "text": {{ "body": "{b}" }}"#))
            .unwrap_or_default();
        payload(&format!(
            r#"{{ "object": "whatsapp_business_account", "entry": [{{ "changes": [{{
                "field": "messages",
                "value": {{
                  "contacts": [{{ "wa_id": "923001234567", "profile": {{ "name": "Ali" }} }}],
                  "messages": [{{ "from": "923001234567", "type": "{msg_type}"{text} }}]
                }}
            }}]}}]}}"#
        ))
    }

    #[test]
    fn text_message_normalizes_with_profile_name() {
        let msg = normalize(&message_payload("text", Some("hello"))).unwrap();
        assert_eq!(msg.sender_id, "923001234567");
        assert_eq!(msg.display_name.as_deref(), Some("Ali"));
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.body, "hello");
    }

    #[rstest]
    #[case("image")]
    #[case("audio")]
    #[case("sticker")]
    fn non_text_kinds_normalize_to_other(#[case] msg_type: &str) {
        let msg = normalize(&message_payload(msg_type, None)).unwrap();
        assert_eq!(msg.kind, MessageKind::Other);
        assert!(msg.body.is_empty());
    }

    #[test]
    fn status_only_callback_is_no_message() {
        let p = payload(
            r#"{ "entry": [{ "changes": [{ "field": "messages", "value": {
                "statuses": [{ "status": "read" }]
            }}]}]}"#,
        );
        assert!(normalize(&p).is_none());
    }

    #[test]
    fn non_message_change_field_is_skipped() {
        let p = payload(
            r#"{ "entry": [{ "changes": [{ "field": "account_update", "value": {
                "messages": [{ "from": "92300", "type": "text", "text": { "body": "x" } }]
            }}]}]}"#,
        );
        assert!(normalize(&p).is_none());
    }

    #[test]
    fn missing_contacts_block_leaves_name_unset() {
        let p = payload(
            r#"{ "entry": [{ "changes": [{ "field": "messages", "value": {
                "messages": [{ "from": "92300", "type": "text", "text": { "body": "hi" } }]
            }}]}]}"#,
        );
        let msg = normalize(&p).unwrap();
        assert!(msg.display_name.is_none());
    }

    #[test]
    fn empty_payload_is_no_message() {
        assert!(normalize(&WebhookPayload::default()).is_none());
    }

    #[test]
    fn message_without_sender_is_dropped() {
        let p = payload(
            r#"{ "entry": [{ "changes": [{ "field": "messages", "value": {
                "messages": [{ "type": "text", "text": { "body": "hi" } }]
            }}]}]}"#,
        );
        assert!(normalize(&p).is_none());
    }
}
