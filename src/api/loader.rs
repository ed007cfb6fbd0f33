//! Background chapter-load sequence
//!
//! Loading a chapter is a three-request sequence: the chapter detail and the
//! best-effort view notification race in parallel, then the comic's chapter
//! index is fetched. Only the detail and index are on the success-critical
//! path. Each load is tagged with a generation; results arriving for a
//! superseded generation are dropped silently - a benign abort, not an
//! error.

use std::sync::Arc;

use flume::{Receiver, Sender};
use log::{debug, warn};

use crate::sequencer::ChapterIndex;

use super::client::{ApiError, ComicClient};
use super::types::ChapterDetail;

/// What a successful load hands to the app.
#[derive(Debug, Clone)]
pub struct LoadedChapter {
    pub chapter: ChapterDetail,
    pub index: ChapterIndex,
}

/// One load request: target identity plus whether this open counts as a
/// read (mode switches within a chapter do not).
#[derive(Debug, Clone, Copy)]
pub struct ChapterRequest {
    pub comic_id: i64,
    pub chapter_id: i64,
    pub mark_viewed: bool,
}

struct LoaderResponse {
    generation: u64,
    result: Result<LoadedChapter, ApiError>,
}

/// Runs chapter-load sequences on background threads and hands results back
/// to the event loop, newest generation wins.
pub struct ChapterLoader {
    client: Arc<ComicClient>,
    response_tx: Sender<LoaderResponse>,
    response_rx: Receiver<LoaderResponse>,
    generation: u64,
}

impl ChapterLoader {
    #[must_use]
    pub fn new(client: Arc<ComicClient>) -> Self {
        let (response_tx, response_rx) = flume::unbounded();
        Self {
            client,
            response_tx,
            response_rx,
            generation: 0,
        }
    }

    /// Start loading a chapter, superseding any load still in flight.
    /// Returns the new generation id.
    pub fn load(&mut self, request: ChapterRequest) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let client = self.client.clone();
        let tx = self.response_tx.clone();

        std::thread::spawn(move || {
            let result = run_sequence(&client, request);
            let _ = tx.send(LoaderResponse { generation, result });
        });

        generation
    }

    /// Drain finished loads. Returns the newest current-generation result,
    /// if one arrived; superseded results are discarded without surfacing.
    pub fn poll(&mut self) -> Option<Result<LoadedChapter, ApiError>> {
        let mut latest = None;
        while let Ok(response) = self.response_rx.try_recv() {
            if response.generation == self.generation {
                latest = Some(response.result);
            } else {
                debug!(
                    "discarding chapter load result from superseded generation {}",
                    response.generation
                );
            }
        }
        latest
    }

    /// Whether a load for the current generation is still outstanding.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn run_sequence(
    client: &Arc<ComicClient>,
    request: ChapterRequest,
) -> Result<LoadedChapter, ApiError> {
    // The view notification races the detail fetch on its own thread. It is
    // joined before the result is reported so rendering never starts with it
    // unsettled, but its failure only gets logged.
    let viewed = request.mark_viewed.then(|| {
        let client = client.clone();
        let chapter_id = request.chapter_id;
        std::thread::spawn(move || client.mark_viewed(chapter_id))
    });

    let chapter = client.chapter(request.chapter_id);

    if let Some(handle) = viewed {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(
                "view notification for chapter {} failed: {err}",
                request.chapter_id
            ),
            Err(_) => warn!("view notification thread panicked"),
        }
    }

    let chapter = chapter?;
    let summaries = client.chapters(request.comic_id)?;

    Ok(LoadedChapter {
        chapter,
        index: ChapterIndex::new(summaries),
    })
}
