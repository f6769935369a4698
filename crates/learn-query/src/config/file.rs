//! TOML configuration file loading

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::builder::ConfigBuilder;
use crate::Result;

/// Configuration file locations checked in order
const CONFIG_PATHS: &[&str] = &[
    "./learn-query.toml",
    "~/.config/learn-query/config.toml",
    "/etc/learn-query/config.toml",
];

/// Find the first existing configuration file
pub fn find_config_file() -> Option<PathBuf> {
    for path_str in CONFIG_PATHS {
        let path = if path_str.starts_with('~') {
            if let Ok(home) = std::env::var("HOME") {
                PathBuf::from(path_str.replacen('~', &home, 1))
            } else {
                continue;
            }
        } else {
            PathBuf::from(path_str)
        };

        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path, builder: ConfigBuilder) -> Result<ConfigBuilder> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let file_config: FileConfig = toml::from_str(&content).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })?;

    apply_file_config(builder, file_config)
}

fn apply_file_config(mut builder: ConfigBuilder, config: FileConfig) -> Result<ConfigBuilder> {
    if let Some(api) = config.api {
        if let Some(url_str) = api.base_url {
            let url = Url::parse(&url_str)
                .map_err(|e| crate::Error::Config(format!("Invalid base URL: {e}")))?;
            builder = builder.base_url(url);
        }

        if let Some(token) = api.csrf_token {
            builder = builder.csrf_token(Some(token));
        }

        if let Some(secs) = api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
    }

    if let Some(cache) = config.cache {
        if let Some(secs) = cache.stale_time_secs {
            builder = builder.stale_time(Duration::from_secs(secs));
        }

        if let Some(secs) = cache.gc_time_secs {
            builder = builder.gc_time(Duration::from_secs(secs));
        }

        if let Some(retry) = cache.retry {
            builder = builder.retry(retry);
        }

        if let Some(ms) = cache.retry_base_delay_ms {
            builder = builder.retry_base_delay(Duration::from_millis(ms));
        }
    }

    if let Some(obs) = config.observability {
        if let Some(name) = obs.service_name {
            builder = builder.service_name(name);
        }

        if let Some(level) = obs.log_level {
            builder = builder.log_level(level);
        }

        if let Some(json) = obs.json_logs {
            builder = builder.json_logs(json);
        }
    }

    Ok(builder)
}

/// Root configuration file structure
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    api: Option<ApiFileConfig>,
    cache: Option<CacheFileConfig>,
    observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Deserialize)]
struct ApiFileConfig {
    base_url: Option<String>,
    csrf_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CacheFileConfig {
    stale_time_secs: Option<u64>,
    gc_time_secs: Option<u64>,
    retry: Option<u32>,
    retry_base_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ObservabilityConfig {
    service_name: Option<String>,
    log_level: Option<String>,
    json_logs: Option<bool>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://learn.mit.edu/api/"
csrf_token = "abc"
timeout_secs = 10

[cache]
stale_time_secs = 60
gc_time_secs = 120
retry = 1
retry_base_delay_ms = 250

[observability]
service_name = "learn-cli"
log_level = "debug"
json_logs = true
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();
        let api = config.api.unwrap();
        assert_eq!(api.base_url.as_deref(), Some("https://learn.mit.edu/api/"));
        assert_eq!(api.timeout_secs, Some(10));

        let cache = config.cache.unwrap();
        assert_eq!(cache.retry, Some(1));
        assert_eq!(cache.retry_base_delay_ms, Some(250));

        assert_eq!(config.observability.unwrap().json_logs, Some(true));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: FileConfig = toml::from_str(
            r#"
[api]
base_url = "https://learn.mit.edu/api/"
"#,
        )
        .unwrap();
        assert!(config.api.is_some());
        assert!(config.cache.is_none());
        assert!(config.observability.is_none());
    }

    #[test]
    fn test_load_from_file_success() {
        let temp_file = create_temp_config(
            r#"
[api]
base_url = "https://learn.mit.edu/api/"

[cache]
stale_time_secs = 30
retry = 0
"#,
        );

        let config = load_from_file(temp_file.path(), ConfigBuilder::new())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api.base_url.as_str(), "https://learn.mit.edu/api/");
        assert_eq!(config.cache.stale_time, Duration::from_secs(30));
        assert_eq!(config.cache.retry, 0);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(
            Path::new("/nonexistent/path/config.toml"),
            ConfigBuilder::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let temp_file = create_temp_config("this is not valid toml {{{{");
        let err = load_from_file(temp_file.path(), ConfigBuilder::new()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_from_file_invalid_url() {
        let temp_file = create_temp_config(
            r#"
[api]
base_url = "not a valid url"
"#,
        );
        let err = load_from_file(temp_file.path(), ConfigBuilder::new()).unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[test]
    fn test_observability_section() {
        let temp_file = create_temp_config(
            r#"
[api]
base_url = "https://learn.mit.edu/api/"

[observability]
log_level = "warn"
json_logs = true
"#,
        );
        let config = load_from_file(temp_file.path(), ConfigBuilder::new())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.telemetry.log_level, "warn");
        assert!(config.telemetry.json_logs);
    }
}
