use std::io::Cursor;
use std::sync::Arc;

use crate::error::FetchError;
use crate::web::HttpTransport;

/// Lazy, per-request handle to a URL's fetched content
///
/// The body is fetched through the injected transport on first access and
/// memoized for the lifetime of this instance. Reassigning the URL to a
/// different value drops the memoized body; reassigning the same value is a
/// no-op.
pub struct Resource {
    url: String,
    transport: Arc<dyn HttpTransport>,
    response: Option<String>,
}

impl Resource {
    pub fn new(url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            url: url.into(),
            transport,
            response: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, new_url: impl Into<String>) {
        let new_url = new_url.into();
        if new_url != self.url {
            self.url = new_url;
            self.response = None;
        }
    }

    /// Handle to the transport this resource fetches through, for
    /// collaborators that need to fetch sibling resources
    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }

    /// Text body of the resource, fetched on first call
    pub fn content(&mut self) -> Result<&str, FetchError> {
        if self.response.is_none() {
            self.response = Some(self.transport.get(&self.url)?);
        }
        Ok(self.response.as_deref().unwrap_or_default())
    }

    /// The same text wrapped for streaming readers
    pub fn content_reader(&mut self) -> Result<Cursor<Vec<u8>>, FetchError> {
        Ok(Cursor::new(self.content()?.as_bytes().to_vec()))
    }
}
