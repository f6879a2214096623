//! Persistence collaborator: appends finalized records to a Google Sheet.

pub mod error;
pub mod sink;

pub use {
    error::{Error, Result},
    sink::{RecordSink, SheetsSink},
};
