use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_initiator::initiate_default_values;
use crate::config::proc_validator;
use crate::config::settings::ClientConfig;

/// Load and validate config from YAML file
pub fn file_to_config(path: &Path) -> Result<ClientConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let expanded = expand_env_vars(&content)?;
    parse_config(expanded)
}

pub fn parse_config(content: String) -> Result<ClientConfig> {
    let client_config: ClientConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    let client_config = initiate_default_values(client_config);
    debug!("validation config ...");
    proc_validator::validate_client_config(&client_config)?;

    Ok(client_config)
}

/// Substitute `${VAR}` and `${VAR:default}` with the environment value.
fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")
        .map_err(|e| anyhow!("env expansion pattern: {}", e))?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}
