//! Configuration management for shopcheck
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/shopcheck/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::core::error::{Result, ShopError};

/// Main configuration for shopcheck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Browser and WebDriver configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Log destinations
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Bounded wait configuration
    #[serde(default)]
    pub waits: WaitConfig,
    /// Target storefront configuration
    #[serde(default)]
    pub site: SiteConfig,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebDriver endpoint to connect to
    pub webdriver_url: String,
    /// Spawn chromedriver ourselves instead of expecting one to be running
    pub spawn_driver: bool,
    /// chromedriver binary used when spawning
    pub driver_binary: String,
    /// Port chromedriver listens on when spawned
    pub driver_port: u16,
    /// Run without a visible window
    pub headless: bool,
    /// Pass --remote-allow-origins=* to the browser
    pub remote_allow_origins: bool,
    /// Level recorded for the browser log channel
    pub browser_log_level: String,
    /// Level recorded for the driver log channel
    pub driver_log_level: String,
}

/// Log destinations, fixed for the whole process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// File holding a tracing filter directive (e.g. `info,shopcheck=debug`)
    pub filter_file: PathBuf,
    /// Where a spawned chromedriver writes its log
    pub driver_log_path: PathBuf,
}

/// Bounded wait configuration, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Readiness wait used by click and send_keys
    pub interaction_timeout_ms: u64,
    /// Wait for result lists to appear
    pub results_timeout_ms: u64,
    /// Wait for the review filter control
    pub filter_timeout_ms: u64,
    /// Wait for a freshly loaded page to settle
    pub settle_timeout_ms: u64,
    /// First poll interval
    pub poll_interval_ms: u64,
    /// Poll interval ceiling for backoff
    pub max_poll_interval_ms: u64,
}

/// Target storefront configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Landing page every scenario starts from
    pub base_url: String,
    /// Query for the ratings scenario
    pub rating_query: String,
    /// Query for the discounts scenario
    pub discount_query: String,
    /// Query for the reviews scenario
    pub review_query: String,
    /// Ratings at or below this value are counted
    pub rating_ceiling: f64,
    /// Discounts strictly above this percentage are reported
    pub discount_threshold: u32,
    /// Cap on re-resolves for one rating index; unset retries without limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relocate_limit: Option<usize>,
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: env::var("SHOPCHECK_WEBDRIVER_URL")
                .unwrap_or_else(|_| "http://localhost:9515".to_string()),
            spawn_driver: env_flag("SHOPCHECK_SPAWN_DRIVER", false),
            driver_binary: env::var("SHOPCHECK_DRIVER_BINARY")
                .unwrap_or_else(|_| "chromedriver".to_string()),
            driver_port: env::var("SHOPCHECK_DRIVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9515),
            headless: env_flag("SHOPCHECK_HEADLESS", false),
            remote_allow_origins: true,
            browser_log_level: "ALL".to_string(),
            driver_log_level: "ALL".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_file: env::var("SHOPCHECK_LOG_FILTER_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logging.filter")),
            driver_log_path: env::var("SHOPCHECK_DRIVER_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("build/chromedriver.log")),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interaction_timeout_ms: 20_000,
            results_timeout_ms: 20_000,
            filter_timeout_ms: 30_000,
            settle_timeout_ms: 15_000,
            poll_interval_ms: 100,
            max_poll_interval_ms: 1_000,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("SHOPCHECK_BASE_URL")
                .unwrap_or_else(|_| "https://www.flipkart.com/".to_string()),
            rating_query: "Washing Machine".to_string(),
            discount_query: "iPhone".to_string(),
            review_query: "Coffee Mug".to_string(),
            rating_ceiling: 4.0,
            discount_threshold: 17,
            relocate_limit: env::var("SHOPCHECK_RELOCATE_LIMIT")
                .ok()
                .and_then(|n| n.parse().ok()),
        }
    }
}

impl WaitConfig {
    /// Readiness timeout for click and send_keys
    pub fn interaction_timeout(&self) -> Duration {
        Duration::from_millis(self.interaction_timeout_ms)
    }

    /// Timeout for result lists
    pub fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }

    /// Timeout for the review filter control
    pub fn filter_timeout(&self) -> Duration {
        Duration::from_millis(self.filter_timeout_ms)
    }

    /// Timeout for page settling
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shopcheck")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    ///
    /// Priority: CLI args > config file > env vars > defaults. `SHOPCHECK_*`
    /// variables only fill the keys the file leaves out. A file that exists
    /// but cannot be read or parsed is reported and ignored.
    pub fn load() -> Self {
        let (config, rejected) = Self::load_reporting();
        if let Some(e) = rejected {
            warn!("{}", e);
        }
        config
    }

    /// Like [`Config::load`], but hands back the rejected-file error instead
    /// of logging it, for callers that install logging from the config
    pub fn load_reporting() -> (Self, Option<ShopError>) {
        let _ = dotenvy::dotenv();

        let config_path = Self::config_file();
        if !config_path.exists() {
            return (Self::default(), None);
        }

        match Self::load_from_file() {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(ShopError::config(format!(
                    "Ignoring {}, using defaults: {}",
                    config_path.display(),
                    e
                ))),
            ),
        }
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ShopError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ShopError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ShopError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file and return the path
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ShopError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ShopError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| ShopError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Check URLs and numeric limits before a run
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("browser.webdriver_url", &self.browser.webdriver_url),
            ("site.base_url", &self.site.base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| ShopError::config(format!("{} is not a URL ({}): {}", name, value, e)))?;
        }

        if self.waits.poll_interval_ms == 0 {
            return Err(ShopError::config("waits.poll_interval_ms must be positive"));
        }

        if self.waits.max_poll_interval_ms < self.waits.poll_interval_ms {
            return Err(ShopError::config(
                "waits.max_poll_interval_ms must not be below waits.poll_interval_ms",
            ));
        }

        Ok(())
    }

    /// Endpoint of a chromedriver we spawn ourselves
    pub fn spawned_driver_url(&self) -> String {
        format!("http://localhost:{}", self.browser.driver_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_waits() {
        let waits = WaitConfig::default();
        assert_eq!(waits.interaction_timeout(), Duration::from_secs(20));
        assert_eq!(waits.filter_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_site_thresholds() {
        let site = SiteConfig::default();
        assert_eq!(site.rating_ceiling, 4.0);
        assert_eq!(site.discount_threshold, 17);
        assert_eq!(site.discount_query, "iPhone");
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("webdriver_url"));
        assert!(toml_str.contains("driver_log_path"));

        let parsed = Config::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.site.review_query, config.site.review_query);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let parsed = Config::from_toml(
            r#"
            [browser]
            headless = true
            "#,
        )
        .unwrap();
        assert!(parsed.browser.headless);
        assert_eq!(parsed.browser.driver_port, BrowserConfig::default().driver_port);
        assert_eq!(parsed.browser.browser_log_level, "ALL");
        assert_eq!(parsed.waits.results_timeout_ms, 20_000);
    }

    #[test]
    fn test_file_without_browser_section_parses() {
        let parsed = Config::from_toml(
            r#"
            [site]
            discount_threshold = 25

            [waits]
            filter_timeout_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(parsed.site.discount_threshold, 25);
        assert_eq!(parsed.site.discount_query, "iPhone");
        assert_eq!(parsed.waits.filter_timeout(), Duration::from_secs(5));
        assert_eq!(parsed.waits.interaction_timeout_ms, 20_000);
        assert!(parsed.browser.remote_allow_origins);
    }

    #[test]
    fn test_relocate_limit_is_opt_in() {
        let parsed = Config::from_toml("[site]\nrelocate_limit = 5\n").unwrap();
        assert_eq!(parsed.site.relocate_limit, Some(5));

        let unset = Config::from_toml("[site]\nrating_ceiling = 3.5\n").unwrap();
        assert_eq!(unset.site.relocate_limit, None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let err = Config::from_toml("[browser]\nheadless = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, ShopError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ShopError::Config(_))));
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("shopcheck"));
    }
}
