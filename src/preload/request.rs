//! Decode request and response types

/// Request sent to decode workers.
#[derive(Debug)]
pub enum DecodeRequest {
    /// Fetch, decode and descramble one page image.
    Page {
        /// Preload generation that enqueued the request, for log correlation.
        generation: u64,
        /// Host-relative image ref, also the cache key.
        image_ref: String,
    },

    /// Shutdown the worker.
    Shutdown,
}

/// Errors from decode workers.
#[derive(Debug, thiserror::Error)]
pub enum DecodeFault {
    #[error("image fetch: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("image decode: {0}")]
    Decode(#[from] image::ImageError),

    #[error("{detail}")]
    Generic { detail: String },
}

impl DecodeFault {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// Response from decode workers. Both variants are terminal: the worker has
/// already written the outcome into the shared cache before sending.
#[derive(Debug)]
pub enum DecodeResponse {
    /// The surface is descrambled and cached.
    Ready { generation: u64, image_ref: String },

    /// The decode failed; the key is marked failed in the cache.
    Failed {
        generation: u64,
        image_ref: String,
        fault: DecodeFault,
    },
}

impl DecodeResponse {
    /// Cache key the response settles.
    #[must_use]
    pub fn image_ref(&self) -> &str {
        match self {
            Self::Ready { image_ref, .. } | Self::Failed { image_ref, .. } => image_ref,
        }
    }
}
