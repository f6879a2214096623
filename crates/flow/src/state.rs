//! One sender's position in the flow plus everything collected so far.

use std::{collections::BTreeMap, time::Instant};

use serde::Serialize;

use crate::script::{Category, Field};

/// The engine's current position in the flow graph for one sender.
///
/// `Start` doubles as the category-selection step: a sender with no stored
/// state is implicitly at `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Start,
    AwaitingName,
    AwaitingProductCategory,
    AwaitingField(Field),
    AwaitingDetail,
}

/// Per-sender conversation state. Owned by the [`ConversationStore`], mutated
/// only by the engine, removed on completion or reset-to-absent.
///
/// [`ConversationStore`]: crate::store::ConversationStore
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub sender_id: String,
    pub step: Step,
    pub category: Option<Category>,
    pub collected: BTreeMap<Field, String>,
    /// When the sender last sent a handled message; drives idle eviction.
    pub last_active: Instant,
}

impl ConversationState {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            step: Step::Start,
            category: None,
            collected: BTreeMap::new(),
            last_active: Instant::now(),
        }
    }

    /// Return to `Start`, discarding the chosen category and all answers.
    pub fn reset(&mut self) {
        self.step = Step::Start;
        self.category = None;
        self.collected.clear();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}
