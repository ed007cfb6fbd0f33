//! Chapter page preloading: concurrent fetch, decode and descramble of every
//! page image into a shared bounded surface cache.

pub mod cache;
pub mod fetch;
pub mod request;
pub mod service;
pub mod worker;

pub use cache::SurfaceCache;
pub use fetch::{HttpImageFetcher, ImageFetcher, resolve_image_url};
pub use request::{DecodeFault, DecodeRequest, DecodeResponse};
pub use service::PreloadService;

/// Default number of decode worker threads.
pub const DEFAULT_WORKERS: usize = 4;

/// Default surface cache capacity, in pages. Generous enough to hold a few
/// chapters of a long-running session without unbounded growth.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;
