//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, STRATEGY_NAMES};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - any timeout is below 100ms or exceeds 5 minutes
    /// - `batch_delay_ms` exceeds one minute
    /// - `user_agent` is empty or `public_prefix` is not absolute
    /// - an endpoint is not an http(s) URL
    /// - `disabled_strategies` names an unknown strategy
    ///
    /// Returns `ConfigError::Missing` if `covers_dir` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("search_timeout_ms", self.search_timeout_ms),
            ("scrape_timeout_ms", self.scrape_timeout_ms),
            ("download_timeout_ms", self.download_timeout_ms),
            ("validate_timeout_ms", self.validate_timeout_ms),
        ];
        for (field, value) in timeouts {
            if value < 100 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
            }
            if value > 300_000 {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.batch_delay_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "batch_delay_ms".into(),
                reason: "must not exceed 60000ms".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if !self.public_prefix.starts_with('/') {
            return Err(ConfigError::Invalid { field: "public_prefix".into(), reason: "must start with '/'".into() });
        }

        if self.covers_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "covers_dir".into(),
                hint: "Set COVERFIND_COVERS_DIR environment variable".into(),
            });
        }

        let endpoints = [
            ("catalog_search_url", &self.catalog_search_url),
            ("cover_id_url", &self.cover_id_url),
            ("cover_isbn_url", &self.cover_isbn_url),
            ("volumes_api_url", &self.volumes_api_url),
            ("image_search_url", &self.image_search_url),
        ];
        for (field, value) in endpoints {
            match url::Url::parse(value) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigError::Invalid { field: field.into(), reason: format!("not an http(s) URL: {value}") });
                }
            }
        }

        if let Some(unknown) = self
            .disabled_strategies
            .iter()
            .find(|name| !STRATEGY_NAMES.contains(&name.as_str()))
        {
            return Err(ConfigError::Invalid {
                field: "disabled_strategies".into(),
                reason: format!("unknown strategy: {unknown}"),
            });
        }

        if self.disabled_strategies.len() == STRATEGY_NAMES.len() {
            tracing::warn!("every cover strategy is disabled; lookups will never find a cover");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { validate_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "validate_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { download_timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "download_timeout_ms"));
    }

    #[test]
    fn test_validate_batch_delay() {
        let config = AppConfig { batch_delay_ms: 61_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "batch_delay_ms"));

        let config = AppConfig { batch_delay_ms: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_relative_public_prefix() {
        let config = AppConfig { public_prefix: "covers".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "public_prefix"));
    }

    #[test]
    fn test_validate_empty_covers_dir() {
        let config = AppConfig { covers_dir: PathBuf::new(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Missing { field, .. }) if field == "covers_dir"));
    }

    #[test]
    fn test_validate_bad_endpoint() {
        let config = AppConfig { catalog_search_url: "ftp://catalog.example".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "catalog_search_url"));

        let config = AppConfig { volumes_api_url: "not a url".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "volumes_api_url"));
    }

    #[test]
    fn test_validate_unknown_strategy() {
        let config = AppConfig { disabled_strategies: vec!["telepathy".into()], ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "disabled_strategies"));

        let config = AppConfig { disabled_strategies: vec!["image_search".into()], ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            search_timeout_ms: 100,
            scrape_timeout_ms: 300_000,
            download_timeout_ms: 100,
            validate_timeout_ms: 300_000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
