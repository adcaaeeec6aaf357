use crate::config::REPO_CONFIG_PATH;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 4830;
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BOT_LOGIN: &str = "eslint-disable-watcher[bot]";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Process-level settings for the service, read from `dw.toml` and `DW_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub webhook_secret: Option<String>,
    pub bot_login: String,
    pub request_timeout_secs: u64,
    pub repo_config_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            github_api_url: DEFAULT_API_URL.to_string(),
            github_token: None,
            webhook_secret: None,
            bot_login: DEFAULT_BOT_LOGIN.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            repo_config_path: REPO_CONFIG_PATH.to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::InvalidSettings {
            message: err.to_string(),
        })
    }

    /// Reads the settings file if given (a missing file is an error when the path was
    /// explicit), then overlays the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|err| {
                    ConfigError::InvalidSettings {
                        message: format!("{}: {err}", path.display()),
                    }
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(value) = lookup("DW_HOST") {
            self.host = parse_var("DW_HOST", &value)?;
        }
        if let Some(value) = lookup("DW_PORT") {
            self.port = parse_var("DW_PORT", &value)?;
        }
        if let Some(value) = lookup("DW_GITHUB_API_URL") {
            self.github_api_url = value;
        }
        if let Some(value) = lookup("DW_GITHUB_TOKEN") {
            self.github_token = Some(value);
        }
        if let Some(value) = lookup("DW_WEBHOOK_SECRET") {
            self.webhook_secret = Some(value);
        }
        if let Some(value) = lookup("DW_BOT_LOGIN") {
            self.bot_login = value;
        }
        if let Some(value) = lookup("DW_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("DW_REQUEST_TIMEOUT_SECS", &value)?;
        }
        Ok(())
    }

    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.github_token
            .as_deref()
            .ok_or_else(|| ConfigError::InvalidSettings {
                message: "a GitHub token is required (DW_GITHUB_TOKEN)".to_string(),
            })
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|err| ConfigError::InvalidSettings {
            message: format!("{key}={value}: {err}"),
        })
}
