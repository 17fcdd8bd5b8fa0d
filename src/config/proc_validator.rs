//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks base url, timeout, retry, logging and auth invariants
//! - Checks every endpoint path is usable by the client

use anyhow::{anyhow, Result};
use tracing::{error, info};

use crate::config::endpoints::EndpointRegistry;
use crate::config::settings::{AuthConfig, ClientConfig, RetryConfig, SettingsConfig};
use crate::config::values::GenericValue;

/// Public entrypoint: returns Ok(()) or an error listing every issue found.
pub fn validate_client_config(cfg: &ClientConfig) -> Result<()> {
    let errors = collect_errors(cfg);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(anyhow!(
            "config is not valid, total errors:{}, \n{}",
            errors.len(),
            errors.join("\n")
        ))
    }
}

pub fn collect_errors(cfg: &ClientConfig) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    if let Some(auth) = &cfg.auth {
        validate_auth(auth, &mut errors);
    }
    validate_endpoints(&cfg.endpoints, &mut errors);

    errors
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    let url = settings.base_url.as_str();
    if url.is_empty() {
        errors.push("settings.base_url must not be empty".to_string());
    } else {
        match url.strip_prefix("http://").or_else(|| url.strip_prefix("https://")) {
            None => errors.push(format!(
                "settings.base_url '{}' must start with http:// or https://",
                url
            )),
            Some(rest) if rest.split(['/', '?', '#']).next().unwrap_or_default().is_empty() => {
                errors.push(format!("settings.base_url '{}' has no host", url));
            }
            Some(_) => {}
        }
    }

    if settings.timeout_ms == Some(0) {
        errors.push("settings.timeout_ms must be > 0".to_string());
    }

    if let Some(retry) = &settings.retry {
        validate_retry("settings.retry", retry, errors);
    }

    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

fn validate_retry(path: &str, retry: &RetryConfig, errors: &mut Vec<String>) {
    if let Some(attempts) = retry.attempts {
        if attempts == 0 {
            errors.push(format!("{}.attempts must be > 0", path));
        }
    }
    if let (Some(base), Some(max)) = (retry.base_delay_ms, retry.max_delay_ms) {
        if max < base {
            errors.push(format!(
                "{}.max_delay_ms ({}) must be >= base_delay_ms ({})",
                path, max, base
            ));
        }
    }
}

/// AUTH VALIDATION
fn validate_auth(auth: &AuthConfig, errors: &mut Vec<String>) {
    if http::HeaderName::from_bytes(auth.header.as_bytes()).is_err() {
        errors.push(format!("auth.header '{}' is not a valid header name", auth.header));
    }
    match &auth.value {
        GenericValue::FromEnv { from_env } if from_env.trim().is_empty() => {
            errors.push("auth.value.from_env must name a variable".to_string());
        }
        GenericValue::FromFile { path } if path.trim().is_empty() => {
            errors.push("auth.value.path must not be empty".to_string());
        }
        _ => {}
    }
}

/// ENDPOINT VALIDATION
fn validate_endpoints(endpoints: &EndpointRegistry, errors: &mut Vec<String>) {
    for (key, path) in endpoints.entries() {
        if path.is_empty() {
            errors.push(format!("endpoints.{} must not be empty", key.to_lowercase()));
        } else if !path.starts_with('/') {
            errors.push(format!(
                "endpoints.{} '{}' must start with '/'",
                key.to_lowercase(),
                path
            ));
        } else if path.chars().any(char::is_whitespace) {
            errors.push(format!(
                "endpoints.{} '{}' must not contain whitespace",
                key.to_lowercase(),
                path
            ));
        }
    }
}
