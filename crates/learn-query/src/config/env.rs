//! Environment variable loading for configuration

use std::env;
use std::time::Duration;

use url::Url;

use super::builder::ConfigBuilder;
use crate::Result;

/// Environment variable names
pub(crate) mod vars {
    pub const LEARN_API_BASE_URL: &str = "LEARN_API_BASE_URL";
    pub const LEARN_API_CSRF_TOKEN: &str = "LEARN_API_CSRF_TOKEN";
    pub const LEARN_API_TIMEOUT_SECS: &str = "LEARN_API_TIMEOUT_SECS";
    pub const LEARN_CACHE_STALE_TIME_SECS: &str = "LEARN_CACHE_STALE_TIME_SECS";
    pub const LEARN_CACHE_GC_TIME_SECS: &str = "LEARN_CACHE_GC_TIME_SECS";
    pub const LEARN_CACHE_RETRY: &str = "LEARN_CACHE_RETRY";
    pub const RUST_LOG: &str = "RUST_LOG";
    pub const LEARN_JSON_LOGS: &str = "LEARN_JSON_LOGS";
}

/// Load configuration from environment variables
pub fn load_from_env(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Ok(url_str) = env::var(vars::LEARN_API_BASE_URL) {
        let url = Url::parse(&url_str).map_err(|e| {
            crate::Error::Config(format!("Invalid {}: {}", vars::LEARN_API_BASE_URL, e))
        })?;
        builder = builder.base_url(url);
    }

    if let Ok(token) = env::var(vars::LEARN_API_CSRF_TOKEN) {
        builder = builder.csrf_token(Some(token));
    }

    if let Ok(timeout_str) = env::var(vars::LEARN_API_TIMEOUT_SECS)
        && let Ok(secs) = timeout_str.parse::<u64>()
    {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    // Cache
    if let Ok(stale_str) = env::var(vars::LEARN_CACHE_STALE_TIME_SECS)
        && let Ok(secs) = stale_str.parse::<u64>()
    {
        builder = builder.stale_time(Duration::from_secs(secs));
    }

    if let Ok(gc_str) = env::var(vars::LEARN_CACHE_GC_TIME_SECS)
        && let Ok(secs) = gc_str.parse::<u64>()
    {
        builder = builder.gc_time(Duration::from_secs(secs));
    }

    if let Ok(retry_str) = env::var(vars::LEARN_CACHE_RETRY)
        && let Ok(retry) = retry_str.parse::<u32>()
    {
        builder = builder.retry(retry);
    }

    // Telemetry
    if let Ok(level) = env::var(vars::RUST_LOG) {
        builder = builder.log_level(level);
    }

    if let Ok(val) = env::var(vars::LEARN_JSON_LOGS) {
        builder = builder.json_logs(parse_bool(&val));
    }

    Ok(builder)
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
