//! Configuration management
//!
//! Supports configuration loading with precedence: env > file > CLI > defaults

mod builder;
mod env;
mod file;

pub use builder::{
    ApiConfig, CacheConfig, Config, ConfigBuilder, DEFAULT_GC_TIME, DEFAULT_RETRY,
    DEFAULT_RETRY_BASE_DELAY, DEFAULT_TIMEOUT, MAX_RETRY_DELAY, TelemetryConfig,
};

use crate::Result;

/// Load configuration with precedence: env > file > `builder`
///
/// `builder` carries CLI values and defaults.
pub fn load_config(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Some(path) = file::find_config_file() {
        tracing::info!("Loading configuration from {}", path.display());
        builder = file::load_from_file(&path, builder)?;
    }

    env::load_from_env(builder)
}

/// Load configuration from a specific file path, then apply env overrides
pub fn load_config_from_path(
    path: &std::path::Path,
    builder: ConfigBuilder,
) -> Result<ConfigBuilder> {
    let builder = file::load_from_file(path, builder)?;
    env::load_from_env(builder)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_config_no_file() {
        // Succeeds even without a config file; build() still needs a URL
        env::tests::with_env_vars(&[], || {
            assert!(load_config(ConfigBuilder::new()).is_ok());
        });
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[api]
base_url = "https://file.example/api/"

[cache]
retry = 2
"#,
        )
        .unwrap();
        file.flush().unwrap();

        env::tests::with_env_vars(&[("LEARN_API_BASE_URL", "https://env.example/api/")], || {
            let config = load_config_from_path(file.path(), ConfigBuilder::new())
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(config.api.base_url.as_str(), "https://env.example/api/");
            assert_eq!(config.cache.retry, 2);
        });
    }

    #[test]
    fn test_file_overrides_cli() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[cache]\nstale_time_secs = 9\n").unwrap();
        file.flush().unwrap();

        env::tests::with_env_vars(&[], || {
            let cli = ConfigBuilder::new()
                .base_url(url::Url::parse("https://cli.example/api/").unwrap())
                .stale_time(Duration::from_secs(1));
            let config = load_config_from_path(file.path(), cli)
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(config.api.base_url.as_str(), "https://cli.example/api/");
            assert_eq!(config.cache.stale_time, Duration::from_secs(9));
        });
    }
}
