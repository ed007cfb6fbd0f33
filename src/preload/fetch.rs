//! Image byte fetching
//!
//! A small seam between the decode workers and the network, so tests can
//! drive the preload pipeline without a server.

use std::time::Duration;

use super::request::DecodeFault;

/// Image refs arrive from the content service as bare host+path strings with
/// no URI scheme; a fixed secure scheme is prepended before any fetch.
#[must_use]
pub fn resolve_image_url(image_ref: &str) -> String {
    format!("https://{image_ref}")
}

/// Fetches raw image bytes for a resolved URL.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeFault>;
}

/// HTTP fetcher used in production. Blocking on purpose: it only ever runs
/// on decode worker threads, never on the UI thread.
pub struct HttpImageFetcher {
    client: reqwest::blocking::Client,
}

impl HttpImageFetcher {
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { client }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeFault> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
