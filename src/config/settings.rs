use serde::Deserialize;

use crate::config::endpoints::EndpointRegistry;
use crate::config::values::GenericValue;
use crate::utils::constants::{DEFAULT_AUTH_HEADER, DEFAULT_HTTP_TIMEOUT_MS};

/// ================================
/// Full client configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub settings: SettingsConfig,
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub endpoints: EndpointRegistry,
}

/// ================================
/// Global client-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    /// console address, e.g. http://localhost:10000
    pub base_url: String,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub body_encoding: BodyEncoding,
    pub retry: Option<RetryConfig>,
    pub logging: Option<LoggingConfig>,
}

impl SettingsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: Some(DEFAULT_HTTP_TIMEOUT_MS),
            body_encoding: BodyEncoding::default(),
            retry: None,
            logging: None,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS)
    }
}

/// How POST payloads are put on the wire.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// application/x-www-form-urlencoded, what the console backend binds
    #[default]
    Form,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    /// will be mutiply by 2 on every attempt until max_delay_ms
    pub base_delay_ms: Option<u64>,
    /// max delay for retrying
    /// invariant: >= base_delay_ms.
    pub max_delay_ms: Option<u64>,
}

/// ================================
/// Auth
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_auth_header")]
    pub header: String,
    pub prefix: Option<String>,
    pub value: GenericValue,
}

fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_owned()
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "compact".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}
