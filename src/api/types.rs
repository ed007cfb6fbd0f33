//! Wire types for the comic content service

use serde::Deserialize;

/// Owning comic, embedded in every chapter payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComicInfo {
    pub id: i64,
    pub name: String,
}

/// One entry of the comic's chapter index (`GET chapter/?comic=`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterSummary {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub views: i64,
    pub comic_info: ComicInfo,
}

/// Chapter detail as it comes off the wire. `src_image` is a string holding
/// the page list in the provider's single-quoted form.
#[derive(Debug, Deserialize)]
pub(crate) struct RawChapterDetail {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub views: i64,
    pub src_image: String,
    pub comic_info: ComicInfo,
}

/// A fully parsed chapter: identity, metadata and the ordered page list.
/// Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterDetail {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub views: i64,
    pub comic_info: ComicInfo,
    /// Ordered host-relative image refs, one per page.
    pub image_refs: Vec<String>,
}

/// Parse the provider's image list field.
///
/// The service encodes the list with single-quote delimiters; the one known
/// quirk is canonicalized to double quotes, after which the payload must be
/// strict JSON. Anything still malformed is an error for the caller to
/// surface as a failed fetch - never a silently empty chapter.
pub fn parse_image_refs(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    let canonical = raw.replace('\'', "\"");
    serde_json::from_str(&canonical)
}
