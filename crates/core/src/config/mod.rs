//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (COVERFIND_*)
//! 2. TOML config file (if COVERFIND_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Timeouts and the inter-item batch delay are politeness constants chosen
//! against the public endpoints, so they live here rather than in code.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Names of the cover strategies in cascade order.
///
/// `disabled_strategies` entries must come from this list.
pub const STRATEGY_NAMES: &[&str] = &[
    "catalog_title_author",
    "catalog_title",
    "catalog_simplified",
    "catalog_simplified_last_name",
    "volumes",
    "isbn",
    "variant_sweep",
    "author_sweep",
    "image_search",
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (COVERFIND_*)
/// 2. TOML config file (if COVERFIND_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory stored cover files are written to.
    ///
    /// Set via COVERFIND_COVERS_DIR environment variable.
    #[serde(default = "default_covers_dir")]
    pub covers_dir: PathBuf,

    /// Public path prefix handed back to callers (`/covers/<file>`).
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,

    /// User-Agent string for API requests.
    ///
    /// Set via COVERFIND_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for catalog and metadata API calls, in milliseconds.
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,

    /// Timeout for header-carrying scrape calls, in milliseconds.
    #[serde(default = "default_scrape_timeout_ms")]
    pub scrape_timeout_ms: u64,

    /// Timeout for a cover file download, in milliseconds.
    #[serde(default = "default_download_timeout_ms")]
    pub download_timeout_ms: u64,

    /// Timeout for an image probe, in milliseconds.
    #[serde(default = "default_validate_timeout_ms")]
    pub validate_timeout_ms: u64,

    /// Pause between batch items, in milliseconds.
    ///
    /// Set via COVERFIND_BATCH_DELAY_MS environment variable.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Bibliographic catalog search endpoint.
    #[serde(default = "default_catalog_search_url")]
    pub catalog_search_url: String,

    /// Base for cover-id images (`{base}/{id}-M.jpg`).
    #[serde(default = "default_cover_id_url")]
    pub cover_id_url: String,

    /// Base for ISBN images (`{base}/{isbn}-M.jpg`).
    #[serde(default = "default_cover_isbn_url")]
    pub cover_isbn_url: String,

    /// Volumes metadata API endpoint.
    #[serde(default = "default_volumes_api_url")]
    pub volumes_api_url: String,

    /// Optional key for the volumes API.
    ///
    /// Set via COVERFIND_VOLUMES_API_KEY environment variable.
    #[serde(default)]
    pub volumes_api_key: Option<String>,

    /// Image search page used by the scrape fallback.
    #[serde(default = "default_image_search_url")]
    pub image_search_url: String,

    /// Hosts whose images are the search page's own assets.
    #[serde(default = "default_ignored_image_hosts", deserialize_with = "name_list")]
    pub ignored_image_hosts: Vec<String>,

    /// Strategies removed from the cascade (see [`STRATEGY_NAMES`]).
    ///
    /// Set via COVERFIND_DISABLED_STRATEGIES environment variable, either
    /// comma-separated (`image_search,isbn`) or as a list (`[image_search]`).
    #[serde(default, deserialize_with = "name_list")]
    pub disabled_strategies: Vec<String>,
}

/// A list setting written either as one comma-separated string or as a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    Joined(String),
    List(Vec<String>),
}

fn name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names = match NameList::deserialize(deserializer)? {
        NameList::Joined(s) => s.split(',').map(str::to_string).collect(),
        NameList::List(v) => v,
    };
    Ok(names.into_iter().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()).collect())
}

fn default_covers_dir() -> PathBuf {
    PathBuf::from("./public/covers")
}

fn default_public_prefix() -> String {
    "/covers".into()
}

fn default_user_agent() -> String {
    "coverfind/0.1".into()
}

fn default_search_timeout_ms() -> u64 {
    10_000
}

fn default_scrape_timeout_ms() -> u64 {
    15_000
}

fn default_download_timeout_ms() -> u64 {
    15_000
}

fn default_validate_timeout_ms() -> u64 {
    5_000
}

fn default_batch_delay_ms() -> u64 {
    500
}

fn default_catalog_search_url() -> String {
    "https://openlibrary.org/search.json".into()
}

fn default_cover_id_url() -> String {
    "https://covers.openlibrary.org/b/id".into()
}

fn default_cover_isbn_url() -> String {
    "https://covers.openlibrary.org/b/isbn".into()
}

fn default_volumes_api_url() -> String {
    "https://www.googleapis.com/books/v1/volumes".into()
}

fn default_image_search_url() -> String {
    "https://www.bing.com/images/search".into()
}

fn default_ignored_image_hosts() -> Vec<String> {
    vec!["bing.com".into(), "bing.net".into(), "microsoft.com".into(), "msn.com".into()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            covers_dir: default_covers_dir(),
            public_prefix: default_public_prefix(),
            user_agent: default_user_agent(),
            search_timeout_ms: default_search_timeout_ms(),
            scrape_timeout_ms: default_scrape_timeout_ms(),
            download_timeout_ms: default_download_timeout_ms(),
            validate_timeout_ms: default_validate_timeout_ms(),
            batch_delay_ms: default_batch_delay_ms(),
            catalog_search_url: default_catalog_search_url(),
            cover_id_url: default_cover_id_url(),
            cover_isbn_url: default_cover_isbn_url(),
            volumes_api_url: default_volumes_api_url(),
            volumes_api_key: None,
            image_search_url: default_image_search_url(),
            ignored_image_hosts: default_ignored_image_hosts(),
            disabled_strategies: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_millis(self.scrape_timeout_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }

    pub fn validate_timeout(&self) -> Duration {
        Duration::from_millis(self.validate_timeout_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Whether the named strategy is part of the cascade.
    pub fn strategy_enabled(&self, name: &str) -> bool {
        !self.disabled_strategies.iter().any(|s| s == name)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `COVERFIND_`
    /// 2. TOML file from `COVERFIND_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("COVERFIND_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("COVERFIND_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
