//! Assembly of the finalized record and the closing replies the sender sees.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    script::{Category, Field},
    state::ConversationState,
};

/// Sentinel used when no name was collected and no profile name is known.
pub const UNKNOWN_NAME: &str = "Unknown";

/// The terminal structured output of one completed conversation, handed by
/// value to the persistence sink. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct FinalizedRecord {
    pub submitted_at: DateTime<Utc>,
    pub sender_id: String,
    pub display_name: String,
    pub category: Category,
    /// Branch-appropriate answers only: salesman/shop/address for
    /// complaints, product category for orders.
    pub fields: BTreeMap<Field, String>,
    pub detail: String,
}

/// Build the record from a state sitting at the terminal collection step.
///
/// `display_name` precedence: the collected name answer, then the cached
/// WhatsApp profile name, then [`UNKNOWN_NAME`].
pub fn finalize(
    state: &ConversationState,
    category: Category,
    detail: &str,
    profile_name: Option<&str>,
) -> FinalizedRecord {
    let mut fields = state.collected.clone();
    let display_name = fields
        .remove(&Field::Name)
        .or_else(|| profile_name.map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    FinalizedRecord {
        submitted_at: Utc::now(),
        sender_id: state.sender_id.clone(),
        display_name,
        category,
        fields,
        detail: detail.to_string(),
    }
}

/// The two messages sent on completion: a summary of the collected answers
/// and a thank-you carrying the category's contact footer.
pub fn closing_replies(record: &FinalizedRecord) -> Vec<String> {
    let mut summary = format!(
        "Thank you, {}! Here is what we received:\nCategory: {}\n",
        record.display_name,
        record.category.label()
    );
    for (field, value) in &record.fields {
        summary.push_str(&format!("{}: {}\n", field.label(), value));
    }
    summary.push_str(&format!("Details: {}", record.detail));

    let closing = format!(
        "Your {} has been registered. {}",
        if record.category.is_order() {
            "order request"
        } else {
            "complaint"
        },
        record.category.footer()
    );

    vec![summary, closing]
}
