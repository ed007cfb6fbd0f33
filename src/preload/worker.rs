//! Decode worker - runs in separate thread(s)

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use image::RgbaImage;
use log::{debug, warn};

use crate::descramble::descramble;

use super::cache::SurfaceCache;
use super::fetch::{ImageFetcher, resolve_image_url};
use super::request::{DecodeFault, DecodeRequest, DecodeResponse};

/// Worker loop: pull page requests from the shared queue until shutdown.
///
/// The outcome is written into the shared cache before the response is sent,
/// so a lookup that races the response channel still sees the settled entry.
pub fn decode_worker(
    fetcher: Arc<dyn ImageFetcher>,
    requests: Receiver<DecodeRequest>,
    responses: Sender<DecodeResponse>,
    cache: Arc<Mutex<SurfaceCache>>,
) {
    while let Ok(request) = requests.recv() {
        match request {
            DecodeRequest::Page {
                generation,
                image_ref,
            } => {
                let response = match decode_page(fetcher.as_ref(), &image_ref) {
                    Ok(surface) => {
                        debug!("decoded page {image_ref} (generation {generation})");
                        cache
                            .lock()
                            .unwrap_or_else(std::sync::PoisonError::into_inner)
                            .insert(image_ref.clone(), surface);
                        DecodeResponse::Ready {
                            generation,
                            image_ref,
                        }
                    }
                    Err(fault) => {
                        warn!("failed to decode page {image_ref}: {fault}");
                        cache
                            .lock()
                            .unwrap_or_else(std::sync::PoisonError::into_inner)
                            .mark_failed(image_ref.clone());
                        DecodeResponse::Failed {
                            generation,
                            image_ref,
                            fault,
                        }
                    }
                };

                if responses.send(response).is_err() {
                    // Service dropped; nothing left to report to.
                    break;
                }
            }

            DecodeRequest::Shutdown => break,
        }
    }
}

fn decode_page(fetcher: &dyn ImageFetcher, image_ref: &str) -> Result<RgbaImage, DecodeFault> {
    let url = resolve_image_url(image_ref);
    let bytes = fetcher.fetch(&url)?;
    let decoded = image::load_from_memory(&bytes)?;
    Ok(descramble(&decoded.to_rgba8()))
}
