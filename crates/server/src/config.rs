use std::{collections::HashMap, fs, io};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
const SERVER_CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8088".into(),
            database_url: "sqlite://./data/leads.db".into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    match fs::read_to_string(SERVER_CONFIG_FILE) {
        Ok(raw) => {
            if let Err(error) = apply_file_overrides(&mut settings, &raw) {
                warn!(file = SERVER_CONFIG_FILE, %error, "ignoring malformed server config");
            }
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => warn!(file = SERVER_CONFIG_FILE, %error, "failed to read server config"),
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Ok(v) = std::env::var("APP__MAX_BODY_BYTES") {
        if let Some(parsed) = parse_max_body_bytes(&v) {
            settings.max_body_bytes = parsed;
        }
    }

    settings
}

fn parse_max_body_bytes(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => {
            warn!(value = raw, "APP__MAX_BODY_BYTES must be positive; keeping previous limit");
            None
        }
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!(value = raw, %error, "APP__MAX_BODY_BYTES is not a byte count; keeping previous limit");
            None
        }
    }
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg.get("database_url").and_then(toml::Value::as_str) {
        settings.database_url = v.to_string();
    }
    if let Some(raw_limit) = file_cfg.get("max_body_bytes") {
        match raw_limit
            .as_integer()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
        {
            Some(v) => settings.max_body_bytes = v,
            None => warn!(value = %raw_limit, "max_body_bytes must be a positive integer; ignoring"),
        }
    }
    Ok(())
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite://") {
        return sqlite_url_for_path(path);
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return sqlite_url_for_path(path);
    }

    if raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    sqlite_url_for_path(raw_database_url)
}

fn sqlite_url_for_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    if has_windows_drive_prefix(&path) {
        format!("sqlite:{path}")
    } else {
        format!("sqlite://{path}")
    }
}

fn has_windows_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
