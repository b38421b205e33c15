use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building an extractor
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The platform configuration file path does not exist
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// The platform configuration file exists but could not be read
    #[error("failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Ambient settings could not be loaded
    #[error("settings error: {0}")]
    Settings(#[from] config::ConfigError),

    /// Builder misconfiguration
    #[error("builder error: {0}")]
    Builder(String),
}

/// Errors that can occur while fetching a resource
///
/// These never escape the extraction pipeline: scrapers catch them and
/// report the attribute as absent instead.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("unexpected status code: {0}")]
    Status(u16),

    /// Reading or writing the on-disk response cache failed
    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),
}
