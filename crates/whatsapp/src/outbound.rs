//! Outbound message delivery via the Cloud API `/messages` endpoint.

use {
    async_trait::async_trait,
    serde::Serialize,
    tracing::{debug, warn},
};

use crate::error::{Error, Result};

/// Send messages back to a sender. Delivery is best effort: the caller logs
/// failures and never feeds them back into conversation state.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    async fn send_text(&self, to: &str, text: &str) -> Result<()>;
}

/// Cloud API sender: `POST {api_base}/{phone_number_id}/messages`.
pub struct CloudApiOutbound {
    http: reqwest::Client,
    api_base: String,
    phone_number_id: String,
    access_token: String,
}

#[derive(Serialize)]
struct SendTextRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: SendTextBody<'a>,
}

#[derive(Serialize)]
struct SendTextBody<'a> {
    body: &'a str,
}

impl CloudApiOutbound {
    pub fn new(
        api_base: impl Into<String>,
        phone_number_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            phone_number_id: phone_number_id.into(),
            access_token: access_token.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_base, self.phone_number_id)
    }
}

#[async_trait]
impl ChannelOutbound for CloudApiOutbound {
    async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let request = SendTextRequest {
            messaging_product: "whatsapp",
            to,
            message_type: "text",
            text: SendTextBody { body: text },
        };

        let response = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(to, chars = text.len(), "sent whatsapp message");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(to, status = status.as_u16(), "cloud api send failed");
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}
