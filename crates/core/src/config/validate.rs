use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Endpoint base URLs parse as absolute http(s) URLs
/// - Fetcher timeout is not 0 and the user agent is not empty
/// - Dataset paths are given together or not at all
/// - The cache root resolves to a directory
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Cache validation
    config.cache.root_dir()?;

    // Endpoint validation
    for (key, value) in [
        ("endpoints.sprite_base_url", &config.endpoints.sprite_base_url),
        (
            "endpoints.animation_base_url",
            &config.endpoints.animation_base_url,
        ),
    ] {
        let url = Url::parse(value).map_err(|e| {
            ConfigError::ValidationError(format!("{} is not a valid URL: {}", key, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "{} must use http or https",
                key
            )));
        }
    }

    // Fetcher validation
    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.fetcher.user_agent.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "fetcher.user_agent cannot be empty".to_string(),
        ));
    }

    // Dataset validation
    if config.datasets.entries_path.is_some() != config.datasets.aliases_path.is_some() {
        return Err(ConfigError::ValidationError(
            "datasets.entries_path and datasets.aliases_path must be set together".to_string(),
        ));
    }

    Ok(())
}
