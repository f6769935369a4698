//! Configuration builder

use std::time::Duration;

use url::Url;

use crate::Error;

/// Default request timeout for the HTTP transport
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time an unobserved entry survives before garbage collection
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

/// Default number of extra attempts for a failed read
pub const DEFAULT_RETRY: u32 = 3;

/// Default delay before the first retry; doubles on each attempt
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on a single retry delay
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub telemetry: TelemetryConfig,
}

impl Config {
    #[must_use]
    pub const fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    #[must_use]
    pub const fn api(&self) -> &ApiConfig {
        &self.api
    }

    #[must_use]
    pub const fn cache(&self) -> &CacheConfig {
        &self.cache
    }
}

/// Where and how to reach the API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub csrf_token: Option<String>,
    pub timeout: Duration,
}

/// Query cache timing and retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long fetched data counts as fresh; zero means always stale
    pub stale_time: Duration,
    /// How long an unobserved entry is kept
    pub gc_time: Duration,
    /// Extra attempts for a failed read; writes are never retried
    pub retry: u32,
    pub retry_base_delay: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            gc_time: DEFAULT_GC_TIME,
            retry: DEFAULT_RETRY,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

impl CacheConfig {
    /// Defaults with retries disabled, so failures surface immediately.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            retry: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero-based)
    #[must_use]
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.retry_base_delay
            .saturating_mul(factor)
            .min(MAX_RETRY_DELAY)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    pub json_logs: bool,
}

/// Configuration builder with fluent API
#[derive(Debug)]
pub struct ConfigBuilder {
    base_url: Option<Url>,
    csrf_token: Option<String>,
    timeout: Duration,
    cache: CacheConfig,
    telemetry: TelemetryConfig,
}

impl ConfigBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base_url: None,
            csrf_token: None,
            timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig {
                stale_time: Duration::ZERO,
                gc_time: DEFAULT_GC_TIME,
                retry: DEFAULT_RETRY,
                retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            },
            telemetry: TelemetryConfig {
                service_name: String::new(),
                log_level: String::new(),
                json_logs: false,
            },
        }
    }

    /// Set the API base URL, e.g. `https://learn.mit.edu/api/`
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the token sent as `X-CSRFToken` on writes
    #[must_use]
    pub fn csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token;
        self
    }

    /// Set the HTTP request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long fetched data stays fresh
    #[must_use]
    pub const fn stale_time(mut self, stale_time: Duration) -> Self {
        self.cache.stale_time = stale_time;
        self
    }

    /// Set how long unobserved entries are kept
    #[must_use]
    pub const fn gc_time(mut self, gc_time: Duration) -> Self {
        self.cache.gc_time = gc_time;
        self
    }

    /// Set the number of read retries
    #[must_use]
    pub const fn retry(mut self, retry: u32) -> Self {
        self.cache.retry = retry;
        self
    }

    /// Set the first retry delay
    #[must_use]
    pub const fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.cache.retry_base_delay = delay;
        self
    }

    #[must_use]
    pub fn service_name(mut self, name: String) -> Self {
        self.telemetry.service_name = name;
        self
    }

    #[must_use]
    pub fn log_level(mut self, level: String) -> Self {
        self.telemetry.log_level = level;
        self
    }

    #[must_use]
    pub const fn json_logs(mut self, enabled: bool) -> Self {
        self.telemetry.json_logs = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> crate::Result<Config> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".into()))?;

        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base_url cannot be used as a base: {base_url}"
            )));
        }

        let service_name = if self.telemetry.service_name.is_empty() {
            "learn-query".to_string()
        } else {
            self.telemetry.service_name
        };

        let log_level = if self.telemetry.log_level.is_empty() {
            "info".to_string()
        } else {
            self.telemetry.log_level
        };

        Ok(Config {
            api: ApiConfig {
                base_url,
                csrf_token: self.csrf_token,
                timeout: self.timeout,
            },
            cache: self.cache,
            telemetry: TelemetryConfig {
                service_name,
                log_level,
                json_logs: self.telemetry.json_logs,
            },
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
