//! The `RecordSink` trait and its Google Sheets implementation.

use {
    async_trait::async_trait,
    serde::Serialize,
    tracing::{debug, warn},
};

use khidmat_flow::{Field, FinalizedRecord};

use crate::error::{Error, Result};

/// Where finalized records go. One call per completed conversation; failures
/// are logged by the caller and never retried or fed back into the flow.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append(&self, record: &FinalizedRecord) -> Result<()>;
}

/// Appends one row per record via the Sheets `values:append` endpoint.
///
/// Columns: time, name, phone, category, salesman, shop, address,
/// product category, detail — blank cells for the other branch's fields.
pub struct SheetsSink {
    http: reqwest::Client,
    api_base: String,
    spreadsheet_id: String,
    worksheet: String,
    access_token: String,
}

#[derive(Serialize)]
struct AppendRequest {
    values: Vec<Vec<String>>,
}

impl SheetsSink {
    pub fn new(
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            access_token: access_token.into(),
        }
    }

    fn append_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            self.api_base, self.spreadsheet_id, self.worksheet
        )
    }
}

/// Flatten a record into its spreadsheet row.
pub fn record_row(record: &FinalizedRecord) -> Vec<String> {
    let field = |f: Field| record.fields.get(&f).cloned().unwrap_or_default();
    vec![
        record
            .submitted_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
        record.display_name.clone(),
        record.sender_id.clone(),
        record.category.label().to_string(),
        field(Field::Salesman),
        field(Field::Shop),
        field(Field::Address),
        field(Field::ProductCategory),
        record.detail.clone(),
    ]
}

#[async_trait]
impl RecordSink for SheetsSink {
    async fn append(&self, record: &FinalizedRecord) -> Result<()> {
        let request = AppendRequest {
            values: vec![record_row(record)],
        };

        let response = self
            .http
            .post(self.append_url())
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(
                sender_id = %record.sender_id,
                category = record.category.label(),
                "appended record to sheet"
            );
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "sheets append failed");
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}
