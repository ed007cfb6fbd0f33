//! Content-service client: chapter detail, chapter index, view notification.

pub mod client;
pub mod loader;
pub mod types;

pub use client::{ApiError, ComicClient};
pub use loader::{ChapterLoader, ChapterRequest, LoadedChapter};
pub use types::{ChapterDetail, ChapterSummary, ComicInfo, parse_image_refs};
