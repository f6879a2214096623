//! Config validation diagnostics, consumed by `khidmat doctor` and logged
//! at startup.

use crate::schema::KhidmatConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The gateway cannot work correctly.
    Error,
    /// The gateway runs, but something will be degraded.
    Warning,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub field: &'static str,
    pub message: String,
}

impl Diagnostic {
    fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field,
            message: message.into(),
        }
    }

    fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field,
            message: message.into(),
        }
    }
}

/// Check a config for deployment problems.
pub fn validate(config: &KhidmatConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if config.whatsapp.verify_token.is_empty() {
        diagnostics.push(Diagnostic::error(
            "whatsapp.verify_token",
            "empty — the webhook subscription handshake will always fail",
        ));
    }
    if config.whatsapp.access_token.is_empty() {
        diagnostics.push(Diagnostic::error(
            "whatsapp.access_token",
            "empty — outbound replies cannot be sent",
        ));
    }
    if config.whatsapp.phone_number_id.is_empty() {
        diagnostics.push(Diagnostic::error(
            "whatsapp.phone_number_id",
            "empty — outbound replies cannot be sent",
        ));
    }
    if config.whatsapp.app_secret.is_none() {
        diagnostics.push(Diagnostic::warning(
            "whatsapp.app_secret",
            "unset — webhook payload signatures will not be verified",
        ));
    }
    if config.sheets.spreadsheet_id.is_empty() || config.sheets.access_token.is_empty() {
        diagnostics.push(Diagnostic::warning(
            "sheets",
            "spreadsheet_id/access_token missing — completed records will not be persisted",
        ));
    }

    diagnostics
}
