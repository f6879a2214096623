//! Per-conversation dialogue engine.
//!
//! Walks a sender through a short structured questionnaire (complaint intake
//! or stock-order intake) one message at a time:
//!
//! - `script` — the flow definition as data: categories, field lists, menu
//!   tokens, prompts, catalogs, reset keywords.
//! - `state` — one sender's position in the flow plus collected answers.
//! - `engine` — the transition function `(state, message) → replies + record`.
//! - `store` — the sender → state map with per-sender atomic updates.
//! - `record` — assembly of the finalized record handed to persistence.
//!
//! The engine is pure with respect to its inputs; delivering replies and
//! persisting records is the caller's job.

pub mod engine;
pub mod record;
pub mod script;
pub mod state;
pub mod store;

pub use {
    engine::{Turn, handle},
    record::FinalizedRecord,
    script::{Category, Field},
    state::{ConversationState, Step},
    store::ConversationStore,
};
