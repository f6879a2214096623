//! Shared message types used across all khidmat crates.

pub mod types;

pub use types::{InboundMessage, MessageKind};
