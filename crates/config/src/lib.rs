//! Configuration loading, validation, and env substitution.
//!
//! Config files: `khidmat.toml`, `khidmat.yaml`, or `khidmat.json`,
//! searched in `./` then `~/.config/khidmat/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values plus direct env
//! overrides for the deployment-critical knobs (`PORT`, `VERIFY_TOKEN`, ...).

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{apply_env_overrides, discover_and_load, find_config_file, load_config},
    schema::{FlowConfig, KhidmatConfig, ServerConfig, SheetsConfig, WhatsAppConfig},
    validate::{Diagnostic, Severity, validate},
};
