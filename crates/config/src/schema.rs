//! Config schema types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KhidmatConfig {
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
    pub sheets: SheetsConfig,
    pub flow: FlowConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0" — the webhook must be
    /// reachable from Meta's servers.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// WhatsApp Cloud API credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Shared token echoed back during the webhook subscription handshake.
    pub verify_token: String,
    /// App secret for `X-Hub-Signature-256` checks. Unset disables signature
    /// verification (the handshake token is still required).
    pub app_secret: Option<String>,
    /// Bearer token for the send API.
    pub access_token: String,
    /// The business phone number id messages are sent from.
    pub phone_number_id: String,
    /// Cloud API base URL; overridable for tests.
    pub api_base: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            verify_token: String::new(),
            app_secret: None,
            access_token: String::new(),
            phone_number_id: String::new(),
            api_base: "https://graph.facebook.com/v19.0".into(),
        }
    }
}

/// Google Sheets persistence sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// OAuth bearer token with spreadsheets scope.
    pub access_token: String,
    /// Worksheet (tab) records are appended to.
    pub worksheet: String,
    /// Sheets API base URL; overridable for tests.
    pub api_base: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            access_token: String::new(),
            worksheet: "Sheet1".into(),
            api_base: "https://sheets.googleapis.com".into(),
        }
    }
}

/// Dialogue flow knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Evict conversations idle for this many minutes. 0 disables eviction
    /// (conversations then live until completed or reset).
    pub idle_minutes: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self { idle_minutes: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = KhidmatConfig::default();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.sheets.worksheet, "Sheet1");
        assert_eq!(cfg.flow.idle_minutes, 0);
        assert!(cfg.whatsapp.app_secret.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: KhidmatConfig = toml::from_str(
            r#"
            [whatsapp]
            verify_token = "sesame"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.whatsapp.verify_token, "sesame");
        assert_eq!(cfg.whatsapp.api_base, "https://graph.facebook.com/v19.0");
        assert_eq!(cfg.server.bind, "0.0.0.0");
    }
}
