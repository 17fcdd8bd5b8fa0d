use crate::config::settings::{ClientConfig, LogFormat, LoggingConfig};
use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_LOG_LEVEL};

pub fn initiate_default_values(mut config: ClientConfig) -> ClientConfig {
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::new(
            DEFAULT_LOG_LEVEL.to_owned(),
            LogFormat::from_env(),
        ));
    }
    if config.settings.timeout_ms.is_none() {
        config.settings.timeout_ms = Some(DEFAULT_HTTP_TIMEOUT_MS);
    }

    config
}
