//! The dialogue transition function, evaluated once per inbound message.
//!
//! Pure with respect to its inputs: it mutates only the passed-in state and
//! returns the replies to send plus, on completion, the finalized record.
//! All delivery and persistence happens in the caller.

use {
    khidmat_common::{InboundMessage, MessageKind},
    tracing::debug,
};

use crate::{
    record::{self, FinalizedRecord},
    script::{self, Category, Field},
    state::{ConversationState, Step},
};

/// The outcome of handling one inbound message.
#[derive(Debug, Default)]
pub struct Turn {
    pub replies: Vec<String>,
    /// Present exactly when the conversation completed; the caller must then
    /// remove the sender's state.
    pub record: Option<FinalizedRecord>,
}

impl Turn {
    fn reply(text: impl Into<String>) -> Self {
        Self {
            replies: vec![text.into()],
            record: None,
        }
    }

    fn silent() -> Self {
        Self::default()
    }

    /// True when the conversation finished and the state should be removed.
    pub fn completed(&self) -> bool {
        self.record.is_some()
    }
}

/// Handle one inbound message against the sender's current state.
///
/// Reset keywords take priority over every step. Menu steps validate against
/// their token set and re-prompt without advancing on a miss; free-text steps
/// accept any non-empty body. Total for every normalized input — never
/// panics, never returns an error.
pub fn handle(state: &mut ConversationState, msg: &InboundMessage) -> Turn {
    if msg.kind != MessageKind::Text {
        return Turn::silent();
    }
    let body = msg.body.trim();

    if script::is_reset(body) {
        debug!(sender_id = %state.sender_id, "reset keyword, back to menu");
        state.reset();
        return Turn::reply(script::category_menu());
    }
    state.touch();

    match state.step {
        Step::Start => match Category::from_token(body) {
            Some(category) => {
                debug!(sender_id = %state.sender_id, category = category.label(), "category selected");
                state.category = Some(category);
                state.step = Step::AwaitingName;
                Turn::reply(Field::Name.prompt())
            },
            None => Turn::reply(script::invalid_category()),
        },

        Step::AwaitingName => {
            if body.is_empty() {
                return Turn::reply(Field::Name.prompt());
            }
            let Some(category) = state.category else {
                // A state past Start without a category is unreachable via
                // the engine; treat it as a fresh conversation.
                state.reset();
                return Turn::reply(script::category_menu());
            };
            state.collected.insert(Field::Name, body.to_string());
            if category.is_order() {
                state.step = Step::AwaitingProductCategory;
                Turn::reply(script::product_menu())
            } else if let Some(first) = category.fields().first() {
                state.step = Step::AwaitingField(*first);
                Turn::reply(first.prompt())
            } else {
                state.step = Step::AwaitingDetail;
                Turn::reply(category.detail_prompt())
            }
        },

        Step::AwaitingProductCategory => match script::product_from_token(body) {
            Some(product) => {
                state
                    .collected
                    .insert(Field::ProductCategory, product.name.to_string());
                state.step = Step::AwaitingDetail;
                Turn::reply(script::catalog_echo(product))
            },
            None => Turn::reply(script::invalid_product()),
        },

        Step::AwaitingField(field) => {
            if body.is_empty() {
                return Turn::reply(field.prompt());
            }
            let Some(category) = state.category else {
                state.reset();
                return Turn::reply(script::category_menu());
            };
            state.collected.insert(field, body.to_string());
            let fields = category.fields();
            let next = fields
                .iter()
                .position(|f| *f == field)
                .and_then(|i| fields.get(i + 1));
            match next {
                Some(next) => {
                    state.step = Step::AwaitingField(*next);
                    Turn::reply(next.prompt())
                },
                None => {
                    state.step = Step::AwaitingDetail;
                    Turn::reply(category.detail_prompt())
                },
            }
        },

        Step::AwaitingDetail => {
            let Some(category) = state.category else {
                state.reset();
                return Turn::reply(script::category_menu());
            };
            if body.is_empty() {
                return Turn::reply(category.detail_prompt());
            }
            let record = record::finalize(state, category, body, msg.display_name.as_deref());
            debug!(
                sender_id = %state.sender_id,
                category = category.label(),
                "conversation finalized"
            );
            Turn {
                replies: record::closing_replies(&record),
                record: Some(record),
            }
        },
    }
}
