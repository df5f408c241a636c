//! URL-keyed image resource cache.
//!
//! The cache never fetches anything itself. The first request for a URL
//! answers [`ImageRequest::Start`], telling the caller to begin the
//! asynchronous load; later requests see the in-flight or resolved entry.
//! Completion is reported back with [`ImageCache::resolve`] or
//! [`ImageCache::fail`], both idempotent.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::HashMap;

use crate::overlay::ResourceSize;

/// State of one cached resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageState {
    Pending,
    Ready(ResourceSize),
    Failed,
}

/// Answer to [`ImageCache::request`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageRequest {
    /// First sight of this URL: the caller must start loading it.
    Start,
    /// A load is already in flight.
    Pending,
    /// Loaded, with its natural size.
    Ready(ResourceSize),
    /// The load failed; it will not be retried.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageState>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `url`, registering it as pending on first sight.
    pub fn request(&mut self, url: &str) -> ImageRequest {
        match self.entries.get(url) {
            Some(ImageState::Pending) => ImageRequest::Pending,
            Some(ImageState::Ready(size)) => ImageRequest::Ready(*size),
            Some(ImageState::Failed) => ImageRequest::Failed,
            None => {
                self.entries.insert(url.to_owned(), ImageState::Pending);
                tracing::debug!(url, "image load requested");
                ImageRequest::Start
            }
        }
    }

    /// Record a completed load. Returns `false` if `url` was already resolved.
    pub fn resolve(&mut self, url: &str, size: ResourceSize) -> bool {
        match self.entries.insert(url.to_owned(), ImageState::Ready(size)) {
            Some(ImageState::Ready(previous)) => {
                if previous != size {
                    tracing::debug!(url, ?previous, ?size, "image resolved again with a different size");
                }
                false
            }
            _ => true,
        }
    }

    /// Record a failed load. A resolved entry is left alone.
    pub fn fail(&mut self, url: &str) {
        let entry = self.entries.entry(url.to_owned()).or_insert(ImageState::Failed);
        if *entry == ImageState::Pending {
            *entry = ImageState::Failed;
        }
    }

    /// Current state without registering anything.
    #[must_use]
    pub fn state(&self, url: &str) -> Option<ImageState> {
        self.entries.get(url).copied()
    }

    /// Natural size of `url`, if it has loaded.
    #[must_use]
    pub fn size(&self, url: &str) -> Option<ResourceSize> {
        match self.entries.get(url) {
            Some(ImageState::Ready(size)) => Some(*size),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
