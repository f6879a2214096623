//! WhatsApp Cloud API channel plumbing.
//!
//! Webhook payload model, the inbound message normalizer, subscription and
//! signature verification, and the outbound send client. No conversation
//! logic lives here — everything stateful is in `khidmat-flow`.

pub mod error;
pub mod normalize;
pub mod outbound;
pub mod types;
pub mod webhook;

pub use {
    error::{Error, Result},
    normalize::normalize,
    outbound::{ChannelOutbound, CloudApiOutbound},
    types::WebhookPayload,
    webhook::{verify_signature, verify_subscription},
};
