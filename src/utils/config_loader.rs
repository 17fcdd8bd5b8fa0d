use std::path::Path;
use anyhow::{anyhow, Result};

use crate::config::proc_loader::file_to_config;
use crate::config::settings::ClientConfig;

pub fn run(config_path: &str) -> Result<ClientConfig> {
    let path = Path::new(config_path);
    file_to_config(path).map_err(|e| anyhow!("Invalid config format: {:#}", e))
}
