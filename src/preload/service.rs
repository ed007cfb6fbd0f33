//! Preload service - manages decode workers and the surface cache

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use image::RgbaImage;
use log::debug;

use super::cache::{EntryState, SurfaceCache};
use super::fetch::ImageFetcher;
use super::request::{DecodeRequest, DecodeResponse};
use super::worker::decode_worker;
use super::{DEFAULT_CACHE_CAPACITY, DEFAULT_WORKERS};

/// Owns the decode worker pool and the shared surface cache, and tracks
/// preload progress for the most recent `preload` call.
///
/// Superseding a preload does not abort in-flight decodes: a decode already
/// running cannot usefully be cancelled and its result is harmless to keep in
/// the shared cache. Cancellation is by generation - bookkeeping simply stops
/// attributing settled keys to the old invocation.
pub struct PreloadService {
    request_tx: Sender<DecodeRequest>,
    response_rx: Receiver<DecodeResponse>,
    cache: Arc<Mutex<SurfaceCache>>,
    num_workers: usize,

    /// Keys with a queued or running decode. Guards at-most-once decode.
    in_flight: HashSet<String>,

    /// Monotonic id of the current preload invocation.
    generation: u64,
    /// Keys of the current generation that have not settled yet.
    outstanding: HashSet<String>,
    total: usize,
    settled: usize,
}

impl PreloadService {
    /// Create a service with default worker and cache configuration.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self::with_config(fetcher, DEFAULT_WORKERS, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a service with an explicit worker count and cache capacity.
    #[must_use]
    pub fn with_config(
        fetcher: Arc<dyn ImageFetcher>,
        num_workers: usize,
        cache_capacity: usize,
    ) -> Self {
        let cache = Arc::new(Mutex::new(SurfaceCache::new(cache_capacity)));

        // Flume gives us MPMC channels: multiple workers pull from one shared
        // request queue, which std/tokio mpsc receivers cannot do.
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        let num_workers = num_workers.max(1);
        for _ in 0..num_workers {
            let fetcher = fetcher.clone();
            let rx = request_rx.clone();
            let tx = response_tx.clone();
            let cache = cache.clone();

            std::thread::spawn(move || {
                decode_worker(fetcher, rx, tx, cache);
            });
        }

        Self {
            request_tx,
            response_rx,
            cache,
            num_workers,
            in_flight: HashSet::new(),
            generation: 0,
            outstanding: HashSet::new(),
            total: 0,
            settled: 0,
        }
    }

    /// Start preloading a chapter's page list, superseding any previous call.
    ///
    /// Keys already settled in the cache (ready or failed) count toward
    /// progress immediately; keys still in flight from an earlier generation
    /// are adopted rather than re-requested; everything else is enqueued.
    /// Returns the new generation id.
    pub fn preload(&mut self, image_refs: &[String]) -> u64 {
        self.generation += 1;
        self.outstanding.clear();
        self.settled = 0;

        let mut seen = HashSet::new();
        let cache = self
            .cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        for image_ref in image_refs {
            if !seen.insert(image_ref.as_str()) {
                continue;
            }

            match cache.state(image_ref) {
                EntryState::Ready | EntryState::Failed => self.settled += 1,
                EntryState::Absent => {
                    self.outstanding.insert(image_ref.clone());
                    if self.in_flight.insert(image_ref.clone()) {
                        let _ = self.request_tx.send(DecodeRequest::Page {
                            generation: self.generation,
                            image_ref: image_ref.clone(),
                        });
                    }
                }
            }
        }
        drop(cache);

        self.total = self.settled + self.outstanding.len();
        debug!(
            "preload generation {}: {} pages, {} already settled",
            self.generation, self.total, self.settled
        );
        self.generation
    }

    /// Drain worker responses and update progress bookkeeping.
    ///
    /// Responses for keys outside the current generation's list are absorbed
    /// silently - their surfaces stay in the shared cache for later reuse,
    /// but they no longer count toward anyone's progress.
    pub fn poll_responses(&mut self) -> Vec<DecodeResponse> {
        let mut responses = vec![];

        while let Ok(response) = self.response_rx.try_recv() {
            let key = response.image_ref().to_string();
            self.in_flight.remove(&key);
            if self.outstanding.remove(&key) {
                self.settled += 1;
            } else {
                debug!("absorbed decode result for superseded key {key}");
            }
            responses.push(response);
        }

        responses
    }

    /// Preload progress in percent, rounded like the progress gauge expects.
    /// An empty chapter has nothing to settle and reports 100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.settled as f64 / self.total as f64) * 100.0).round() as u8
    }

    /// Whether every page of the current generation has reached a terminal
    /// state (ready or failed).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Synchronous cache lookup for the renderer. Never blocks on a fetch
    /// and never triggers one.
    #[must_use]
    pub fn is_preloaded(&self, image_ref: &str) -> Option<Arc<RgbaImage>> {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(image_ref)
    }

    /// Whether the key's decode failed earlier in the session.
    #[must_use]
    pub fn is_failed(&self, image_ref: &str) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_failed(image_ref)
    }

    /// Current preload generation id.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Shutdown all workers.
    pub fn shutdown(&self) {
        for _ in 0..self.num_workers {
            let _ = self.request_tx.send(DecodeRequest::Shutdown);
        }
    }
}

impl Drop for PreloadService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
