use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use core_types::Locator;
use utils::id_util;

/// Receives hints about items that are about to be displayed so their
/// rendering can be prepared ahead of time. Submitting is fire-and-forget.
pub trait RenderCache: Send + Sync {
    fn prefetch(&self, locators: Vec<Locator>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderCache;

impl RenderCache for NoopRenderCache {
    fn prefetch(&self, _locators: Vec<Locator>) {}
}

/// Generates thumbnails in the background for locators that are file paths.
#[derive(Debug, Clone)]
pub struct ThumbnailRenderCache {
    thumbnails_dir: PathBuf,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ThumbnailRenderCache {
    pub fn new(thumbnails_dir: impl Into<PathBuf>) -> Self {
        Self {
            thumbnails_dir: thumbnails_dir.into(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn thumbnail_for(&self, locator: &Locator) -> PathBuf {
        thumbnails::thumbnail_path(&self.thumbnails_dir, &id_util::cache_key(locator.as_str()))
    }
}

impl RenderCache for ThumbnailRenderCache {
    fn prefetch(&self, locators: Vec<Locator>) {
        for locator in locators {
            let cache_key = id_util::cache_key(locator.as_str());
            if self.thumbnail_for(&locator).exists() {
                continue;
            }
            let newly_added = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(cache_key.clone());
            if !newly_added {
                continue;
            }

            let thumbnails_dir = self.thumbnails_dir.clone();
            let in_flight = self.in_flight.clone();
            async_std::task::spawn(async move {
                let source = locator.to_path_buf();
                let key = cache_key.clone();
                let res = async_std::task::spawn_blocking(move || {
                    thumbnails::prepare_thumbnail(&source, &thumbnails_dir, &key)
                })
                .await;
                match res {
                    Ok(path) => tracing::debug!("Prepared thumbnail {}", path.display()),
                    Err(e) => tracing::warn!("Failed to prepare thumbnail for {}: {}", locator, e),
                }
                in_flight
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&cache_key);
            });
        }
    }
}
