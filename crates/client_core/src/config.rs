use std::{collections::HashMap, fs, io::ErrorKind, path::Path};

use url::Url;

use crate::error::ClientConfigError;

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8088";
pub const CLIENT_CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub gateway_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.into(),
        }
    }
}

/// Reads `client.toml` from the working directory, then applies environment overrides.
pub fn load_client_settings() -> Result<ClientSettings, ClientConfigError> {
    load_client_settings_from(Path::new(CLIENT_CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_client_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, ClientConfigError> {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, String>>(&raw).map_err(|source| {
                ClientConfigError::Parse {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            if let Some(v) = file_cfg.get("gateway_url") {
                settings.gateway_url = v.clone();
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ClientConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    }

    if let Some(v) = env("LEAD_GATEWAY_URL") {
        settings.gateway_url = v;
    }
    if let Some(v) = env("APP__GATEWAY_URL") {
        settings.gateway_url = v;
    }

    settings.gateway_url = validate_gateway_url(&settings.gateway_url)?;
    Ok(settings)
}

pub fn validate_gateway_url(raw: &str) -> Result<String, ClientConfigError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|source| ClientConfigError::InvalidGatewayUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
