use clap::ValueEnum;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::settings::{ClientConfig, LogFormat, LoggingConfig};
use crate::utils::constants::DEFAULT_LOG_LEVEL;


#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "TRACE",
            LogLevel::DEBUG => "DEBUG",
            LogLevel::INFO => "INFO",
            LogLevel::WARN => "WARN",
            LogLevel::ERROR => "ERROR",
        }
    }
}

/// Command line level wins over the config file, config file over the default.
pub fn resolve_logging_config(client_config: &ClientConfig, arg_log_level: Option<LogLevel>) -> LoggingConfig {
    let configured = client_config.settings.logging.as_ref();

    let level = arg_log_level
        .map(|level| level.as_str().to_lowercase())
        .or_else(|| configured.map(|config| config.level.to_owned()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());
    let format = configured
        .map(|config| config.format.to_owned())
        .unwrap_or(LogFormat::Compact);

    LoggingConfig::new(level, format)
}

pub fn run(client_config: &ClientConfig, arg_log_level: Option<LogLevel>) {
    init_logging(&resolve_logging_config(client_config, arg_log_level));
}


/// Initialize tracing with the desired config.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    // Base layer: filter + writer
    let registry = tracing_subscriber::registry().with(env_filter);

    // logs go to stderr, stdout carries the command result
    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true)
                .with_ansi(false)
                .with_writer(std::io::stderr);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(true)
                .with_writer(std::io::stderr);

            let _ = registry.with(layer).try_init();
        }
    };
}
