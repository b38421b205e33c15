use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Ambient engine settings
///
/// Everything here is operational tuning; the per-platform extraction rules
/// live in the sectioned platforms file (see [`crate::registry`]).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Path of the platforms configuration file loaded by default
    #[serde(default = "default_platforms_file")]
    pub platforms_file: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every page request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Directory for the on-disk response cache; `None` disables caching
    #[serde(default = "default_cache_dir")]
    pub cache_dir: Option<String>,
    /// Base URL of the commerce catalog lookup service
    #[serde(default = "default_catalog_endpoint")]
    pub catalog_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platforms_file: default_platforms_file(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            cache_dir: default_cache_dir(),
            catalog_endpoint: default_catalog_endpoint(),
        }
    }
}

// Default value functions
fn default_platforms_file() -> String {
    "platforms.ini".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; PricetagBot/1.0)".to_string()
}

fn default_cache_dir() -> Option<String> {
    Some(".webcache".to_string())
}

fn default_catalog_endpoint() -> String {
    "https://catalog.pricetag.dev/items".to_string()
}

impl Settings {
    /// Load settings from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PRICETAG__ prefix
    /// 2. pricetag.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PRICETAG__CACHE_DIR
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional settings file (can be missing)
            .add_source(File::with_name("pricetag").required(false))
            .add_source(
                Environment::with_prefix("PRICETAG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let settings = Settings::default();
        assert_eq!(settings.platforms_file, "platforms.ini");
        assert_eq!(settings.timeout, 30);
        assert_eq!(settings.cache_dir.as_deref(), Some(".webcache"));
        assert!(settings.user_agent.contains("PricetagBot"));
    }
}
