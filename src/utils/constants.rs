//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_AUTH_HEADER: &str = "Authorization";

// retry defaults, one attempt means no retry
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 1000;
