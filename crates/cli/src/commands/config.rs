use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult};

const COMMAND: &str = "config";

/// One effective setting and where its value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

pub fn run() -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let entry = |key: &str, value: String, env_keys: &[&str]| ConfigEntry {
        key: key.to_string(),
        value,
        source: field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref()),
    };

    let access_token =
        config.api.bearer_token().map(redact_token).unwrap_or_else(|| "<unset>".to_string());
    let entries = vec![
        entry("api.base_url", config.api.base_url.clone(), &["DOCFLOW_API_BASE_URL"]),
        entry("api.timeout_secs", config.api.timeout_secs.to_string(), &["DOCFLOW_API_TIMEOUT_SECS"]),
        entry("api.access_token", access_token, &["DOCFLOW_API_ACCESS_TOKEN"]),
        entry(
            "dashboard.page_size",
            config.dashboard.page_size.to_string(),
            &["DOCFLOW_DASHBOARD_PAGE_SIZE"],
        ),
        entry(
            "workflow.step_delay_ms",
            config.workflow.step_delay_ms.to_string(),
            &["DOCFLOW_WORKFLOW_STEP_DELAY_MS"],
        ),
        entry(
            "logging.level",
            config.logging.level.clone(),
            &["DOCFLOW_LOGGING_LEVEL", "DOCFLOW_LOG_LEVEL"],
        ),
        entry(
            "logging.format",
            config.logging.format.as_str().to_string(),
            &["DOCFLOW_LOGGING_FORMAT", "DOCFLOW_LOG_FORMAT"],
        ),
    ];

    CommandResult::success_with(
        COMMAND,
        "effective config (source precedence: env > file > default)",
        &entries,
    )
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("docflow.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/docflow.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

/// Keeps at most the first four characters of a bearer token.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }
    if trimmed.chars().count() <= 8 {
        return "<redacted>".to_string();
    }
    let prefix: String = trimmed.chars().take(4).collect();
    format!("{prefix}***")
}
