use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::KhidmatConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "khidmat.toml",
    "khidmat.yaml",
    "khidmat.yml",
    "khidmat.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<KhidmatConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply env
/// overrides.
///
/// Search order:
/// 1. `./khidmat.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/khidmat/khidmat.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `KhidmatConfig::default()` when no file is found.
pub fn discover_and_load() -> KhidmatConfig {
    let mut config = if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                KhidmatConfig::default()
            },
        }
    } else {
        debug!("no config file found, using defaults");
        KhidmatConfig::default()
    };
    apply_env_overrides(&mut config);
    config
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "khidmat") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Apply environment-variable overrides for deployment-critical settings.
pub fn apply_env_overrides(config: &mut KhidmatConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(
    config: &mut KhidmatConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(port) = lookup("PORT").and_then(|v| v.parse().ok()) {
        config.server.port = port;
    }
    if let Some(bind) = lookup("BIND") {
        config.server.bind = bind;
    }
    if let Some(token) = lookup("VERIFY_TOKEN") {
        config.whatsapp.verify_token = token;
    }
    if let Some(secret) = lookup("WHATSAPP_APP_SECRET") {
        config.whatsapp.app_secret = Some(secret);
    }
    if let Some(token) = lookup("WHATSAPP_ACCESS_TOKEN") {
        config.whatsapp.access_token = token;
    }
    if let Some(id) = lookup("WHATSAPP_PHONE_NUMBER_ID") {
        config.whatsapp.phone_number_id = id;
    }
    if let Some(id) = lookup("SHEET_ID") {
        config.sheets.spreadsheet_id = id;
    }
    if let Some(token) = lookup("SHEETS_ACCESS_TOKEN") {
        config.sheets.access_token = token;
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<KhidmatConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
