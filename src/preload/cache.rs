//! Bounded LRU cache of descrambled page surfaces
//!
//! One instance is owned by the [`PreloadService`](super::PreloadService) and
//! shared with its decode workers. Keys are the host-relative image refs the
//! content service hands out, so a page that reappears in another chapter is
//! reused instead of re-decoded.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use image::RgbaImage;
use lru::LruCache;

/// Terminal state of a cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    /// No decode has settled for this key.
    Absent,
    /// A descrambled surface is available.
    Ready,
    /// The decode failed; the key stays failed for the session.
    Failed,
}

/// LRU cache of ready surfaces plus a sticky set of failed keys.
///
/// Failed keys are kept outside the LRU so cache pressure cannot silently
/// re-enable a retry that the error policy forbids.
pub struct SurfaceCache {
    surfaces: LruCache<String, Arc<RgbaImage>>,
    failed: HashSet<String>,
}

impl SurfaceCache {
    /// Create a cache holding at most `capacity` ready surfaces.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            surfaces: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).expect("1 is non-zero")),
            ),
            failed: HashSet::new(),
        }
    }

    /// Get a ready surface, promoting it in the LRU order.
    #[must_use]
    pub fn get(&mut self, key: &str) -> Option<Arc<RgbaImage>> {
        self.surfaces.get(key).cloned()
    }

    /// Check for a ready surface without promoting it.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.surfaces.contains(key)
    }

    /// Whether the key's decode failed earlier in this session.
    #[must_use]
    pub fn is_failed(&self, key: &str) -> bool {
        self.failed.contains(key)
    }

    /// Terminal state recorded for a key.
    #[must_use]
    pub fn state(&self, key: &str) -> EntryState {
        if self.surfaces.contains(key) {
            EntryState::Ready
        } else if self.failed.contains(key) {
            EntryState::Failed
        } else {
            EntryState::Absent
        }
    }

    /// Insert a descrambled surface, returning the shared handle.
    pub fn insert(&mut self, key: String, surface: RgbaImage) -> Arc<RgbaImage> {
        self.failed.remove(&key);
        let arc = Arc::new(surface);
        self.surfaces.put(key, arc.clone());
        arc
    }

    /// Record a failed decode for a key.
    pub fn mark_failed(&mut self, key: String) {
        self.failed.insert(key);
    }

    /// Number of ready surfaces currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Check if no surfaces are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Maximum number of ready surfaces.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.surfaces.cap().get()
    }
}
