use std::{env, fs};

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Value sources for secrets kept out of the config file
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum GenericValue {
    Literal {
        value: String,
    },
    FromEnv {
        from_env: String,
    },
    FromFile {
        path: String,
    },
}

impl GenericValue {
    /// Read the value now. Env vars and files are looked up on every call so
    /// a rotated credential is picked up without a restart.
    pub fn resolve(&self) -> Result<String> {
        match self {
            GenericValue::Literal { value } => Ok(value.to_owned()),
            GenericValue::FromEnv { from_env } => env::var(from_env)
                .map_err(|err| anyhow!("env var '{}': {}", from_env, err)),
            GenericValue::FromFile { path } => fs::read_to_string(path)
                .map_err(|err| anyhow!("file '{}': {}", path, err))
                .map(|res| res.trim().to_string()),
        }
    }
}
