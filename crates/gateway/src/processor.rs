//! Per-event orchestration: normalize → engine (under the sender's entry
//! lock) → deliver replies → persist the record.

use std::sync::Arc;

use tracing::{debug, warn};

use {
    khidmat_flow::{
        engine,
        store::{ConversationStore, Disposition},
    },
    khidmat_sheets::RecordSink,
    khidmat_whatsapp::{ChannelOutbound, WebhookPayload, normalize},
};

/// Wires the stateless collaborators around the dialogue engine.
///
/// Side effects are best effort: a failed send or append is logged and
/// dropped — the conversation has already advanced (or terminated) and is
/// never rolled back (see the store contract for the atomicity boundary).
pub struct Processor {
    store: Arc<ConversationStore>,
    outbound: Arc<dyn ChannelOutbound>,
    sink: Arc<dyn RecordSink>,
}

impl Processor {
    pub fn new(
        store: Arc<ConversationStore>,
        outbound: Arc<dyn ChannelOutbound>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            store,
            outbound,
            sink,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Process one webhook payload end to end. Never returns an error: every
    /// failure mode is either a quiet no-op or a logged, dropped side effect.
    pub async fn process(&self, payload: WebhookPayload) {
        let Some(mut msg) = normalize(&payload) else {
            debug!("webhook carried no user message");
            return;
        };

        // Keep the profile-name cache warm; fill from it when this payload
        // had no contacts block.
        match &msg.display_name {
            Some(name) => self.store.remember_name(&msg.sender_id, name),
            None => msg.display_name = self.store.cached_name(&msg.sender_id),
        }

        let sender_id = msg.sender_id.clone();
        let turn = self.store.transact(&sender_id, |state| {
            let turn = engine::handle(state, &msg);
            let disposition = if turn.completed() {
                Disposition::Remove
            } else {
                Disposition::Keep
            };
            (turn, disposition)
        });

        for reply in &turn.replies {
            if let Err(e) = self.outbound.send_text(&sender_id, reply).await {
                warn!(sender_id, error = %e, "failed to send reply");
            }
        }

        if let Some(record) = turn.record
            && let Err(e) = self.sink.append(&record).await
        {
            warn!(
                sender_id,
                category = record.category.label(),
                error = %e,
                "failed to persist finalized record"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        async_trait::async_trait,
        khidmat_flow::FinalizedRecord,
        std::sync::Mutex,
    };

    #[derive(Default)]
    struct FakeOutbound {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl ChannelOutbound for FakeOutbound {
        async fn send_text(&self, to: &str, text: &str) -> khidmat_whatsapp::Result<()> {
            if self.fail {
                return Err(khidmat_whatsapp::Error::message("send down"));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), text.to_string()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeSink {
        records: Mutex<Vec<FinalizedRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl RecordSink for FakeSink {
        async fn append(&self, record: &FinalizedRecord) -> khidmat_sheets::Result<()> {
            if self.fail {
                return Err(khidmat_sheets::Error::Api {
                    status: 500,
                    body: "down".into(),
                });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn processor(
        outbound: Arc<FakeOutbound>,
        sink: Arc<FakeSink>,
    ) -> (Processor, Arc<ConversationStore>) {
        let store = Arc::new(ConversationStore::new());
        (
            Processor::new(Arc::clone(&store), outbound, sink),
            store,
        )
    }

    fn text_payload(from: &str, body: &str, name: Option<&str>) -> WebhookPayload {
        let contacts = name
            .map(|n| {
                format!(r#""contacts": [{{ "wa_id": "{from}", "profile": {{ "name": "{n}" }} }}],"#)
            })
            .unwrap_or_default();
        serde_json::from_str(&format!(
            r#"{{ "object": "whatsapp_business_account", "entry": [{{ "changes": [{{
                "field": "messages",
                "value": {{
                  {contacts}
                  "messages": [{{ "from": "{from}", "type": "text", "text": {{ "body": "{body}" }} }}]
                }}
            }}]}}]}}"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn full_conversation_sends_replies_and_persists_once() {
        let outbound = Arc::new(FakeOutbound::default());
        let sink = Arc::new(FakeSink::default());
        let (processor, store) = processor(Arc::clone(&outbound), Arc::clone(&sink));

        for body in ["hi", "1", "Ali", "Rafiq", "ABC Store", "Main Street"] {
            processor
                .process(text_payload("923001234567", body, Some("Ali W")))
                .await;
        }
        assert!(store.contains("923001234567"));
        assert!(sink.records.lock().unwrap().is_empty());

        processor
            .process(text_payload("923001234567", "Broken fridge", None))
            .await;

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].detail, "Broken fridge");
        assert!(!store.contains("923001234567"));

        // Final turn sent the summary and the closing footer.
        let sent = outbound.sent.lock().unwrap();
        let last_two: Vec<_> = sent.iter().rev().take(2).collect();
        assert!(last_two[1].1.contains("Here is what we received"));
        assert!(last_two[0].1.contains("has been registered"));
    }

    #[tokio::test]
    async fn status_only_payload_is_a_quiet_noop() {
        let outbound = Arc::new(FakeOutbound::default());
        let sink = Arc::new(FakeSink::default());
        let (processor, store) = processor(Arc::clone(&outbound), Arc::clone(&sink));

        let payload: WebhookPayload = serde_json::from_str(
            r#"{ "entry": [{ "changes": [{ "field": "messages", "value": {
                "statuses": [{ "status": "delivered" }]
            }}]}]}"#,
        )
        .unwrap();
        processor.process(payload).await;

        assert!(store.is_empty());
        assert!(outbound.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn collaborator_failures_do_not_disturb_the_flow() {
        let outbound = Arc::new(FakeOutbound {
            fail: true,
            ..Default::default()
        });
        let sink = Arc::new(FakeSink {
            fail: true,
            ..Default::default()
        });
        let (processor, store) = processor(outbound, sink);

        processor
            .process(text_payload("92300", "1", Some("Ali")))
            .await;
        // The state advanced even though the reply could not be delivered.
        assert_eq!(
            store.get("92300").step,
            khidmat_flow::Step::AwaitingName
        );
    }

    #[tokio::test]
    async fn cached_profile_name_backfills_later_payloads() {
        let outbound = Arc::new(FakeOutbound::default());
        let sink = Arc::new(FakeSink::default());
        let (processor, store) = processor(outbound, Arc::clone(&sink));

        // First payload carries the profile name; later ones don't.
        processor
            .process(text_payload("92300", "4", Some("Bilal")))
            .await;
        assert_eq!(store.cached_name("92300").as_deref(), Some("Bilal"));

        // Later payloads without a contacts block leave the cache intact.
        processor.process(text_payload("92300", "reset", None)).await;
        assert_eq!(store.cached_name("92300").as_deref(), Some("Bilal"));
    }
}
