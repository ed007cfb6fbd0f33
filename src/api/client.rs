//! Blocking HTTP client for the content service
//!
//! Only ever called from background threads (the chapter loader); the UI
//! thread never issues a request.

use std::time::Duration;

use log::debug;
use reqwest::header::ACCEPT;

use super::types::{ChapterDetail, ChapterSummary, RawChapterDetail, parse_image_refs};

/// Errors from the content service boundary. Only these surface to the user
/// (with a retry affordance); everything downstream is absorbed locally.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("content service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chapter {chapter_id}: malformed image list: {source}")]
    MalformedImageList {
        chapter_id: i64,
        #[source]
        source: serde_json::Error,
    },
}

/// Client for one content service instance.
pub struct ComicClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ComicClient {
    /// Create a client for the service at `base_url` (scheme + host + path
    /// prefix, no trailing slash required).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// `GET chapter/{id}`: fetch and parse one chapter's detail. A payload
    /// whose image list does not parse is a hard error, not an empty chapter.
    pub fn chapter(&self, chapter_id: i64) -> Result<ChapterDetail, ApiError> {
        let url = format!("{}/chapter/{chapter_id}", self.base_url);
        debug!("fetching chapter detail: {url}");

        let raw: RawChapterDetail = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()?
            .error_for_status()?
            .json()?;

        let image_refs = parse_image_refs(&raw.src_image)
            .map_err(|source| ApiError::MalformedImageList { chapter_id, source })?;

        Ok(ChapterDetail {
            id: raw.id,
            number: raw.number,
            title: raw.title,
            views: raw.views,
            comic_info: raw.comic_info,
            image_refs,
        })
    }

    /// `GET chapter/?comic={id}`: the comic's chapter index.
    pub fn chapters(&self, comic_id: i64) -> Result<Vec<ChapterSummary>, ApiError> {
        let url = format!("{}/chapter/?comic={comic_id}", self.base_url);
        debug!("fetching chapter index: {url}");

        let summaries = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()?
            .error_for_status()?
            .json()?;

        Ok(summaries)
    }

    /// `PUT chapter/{id}/view/`: best-effort view notification. The caller
    /// logs the outcome and must never let it affect rendering.
    pub fn mark_viewed(&self, chapter_id: i64) -> Result<(), ApiError> {
        let url = format!("{}/chapter/{chapter_id}/view/", self.base_url);
        let response = self
            .client
            .put(&url)
            .header(ACCEPT, "application/json")
            .send()?;

        debug!("view notification for chapter {chapter_id}: {}", response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ComicClient::new("https://comics.example.org/api/");
        assert_eq!(client.base_url, "https://comics.example.org/api");
    }
}
