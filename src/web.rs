use std::collections::HashMap;
use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use log::{debug, warn};

use crate::error::FetchError;
use crate::settings::Settings;

/// The HTTP capability the engine consumes
///
/// Injected into every [`crate::Resource`] so tests can substitute a canned
/// transport without process-wide shared state.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP client with an optional on-disk response cache
///
/// Cached bodies are keyed by URL; a hit skips the network entirely. The
/// cache has no eviction of its own, matching the lifetime of the cache
/// directory.
pub struct WebClient {
    client: reqwest::blocking::Client,
    cache_dir: Option<PathBuf>,
}

impl WebClient {
    pub fn new(settings: &Settings) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout))
            .user_agent(settings.user_agent.clone())
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            cache_dir: settings.cache_dir.as_ref().map(PathBuf::from),
        }
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        Some(dir.join(format!("{:016x}", hasher.finish())))
    }
}

impl HttpTransport for WebClient {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        if let Some(path) = self.cache_path(url) {
            if let Ok(body) = fs::read_to_string(&path) {
                debug!("cache hit for {url}");
                return Ok(body);
            }
        }

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text()?;

        if let Some(path) = self.cache_path(url) {
            let write = path
                .parent()
                .map(fs::create_dir_all)
                .unwrap_or(Ok(()))
                .and_then(|_| fs::write(&path, &body));
            if let Err(err) = write {
                warn!("failed to cache response for {url}: {err}");
            }
        }

        Ok(body)
    }
}

/// Transport serving canned bodies from memory
///
/// Used by the test suite and for offline replays; unknown URLs answer 404.
#[derive(Default)]
pub struct StaticTransport {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Number of times `get` has been called, cache misses included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl HttpTransport for StaticTransport {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}
