//! Gateway: the webhook HTTP server and the per-event processing pipeline.
//!
//! Lifecycle:
//! 1. Load + validate config
//! 2. Build store, outbound client, record sink
//! 3. Serve `GET /` (subscription verify), `POST /` (webhook), `GET /health`
//! 4. Optionally sweep idle conversations
//!
//! All dialogue logic lives in `khidmat-flow`; this crate only normalizes,
//! locks the sender's state, runs the engine, and performs the side effects
//! the engine emitted.

pub mod processor;
pub mod server;

pub use {
    processor::Processor,
    server::{AppState, build_app, run},
};
