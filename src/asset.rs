//! Sheet loading.
//!
//! Every sheet decodes on its own thread. A shared countdown is decremented on success and
//! failure alike, and the continuation runs exactly once when it reaches zero, so a missing
//! file can never stall the scene in its loading state.

use std::collections::HashMap;
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::AssetConfig;
use crate::error::AssetError;
use crate::texture::raster::RasterImage;

/// One image to load, identified by `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub key: String,
    pub path: PathBuf,
}

impl AssetRequest {
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// Decoded images by key, plus the keys that failed.
#[derive(Debug, Default, Clone)]
pub struct LoadedAssets {
    images: HashMap<String, Arc<RasterImage>>,
    failed: Vec<String>,
}

impl LoadedAssets {
    pub fn get(&self, key: &str) -> Option<Arc<RasterImage>> {
        self.images.get(key).cloned()
    }

    pub fn insert(&mut self, key: impl Into<String>, image: RasterImage) {
        self.images.insert(key.into(), Arc::new(image));
    }

    pub fn mark_failed(&mut self, key: impl Into<String>) {
        self.failed.push(key.into());
    }

    /// Keys that could not be read or decoded, in completion order.
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Reads and decodes one image into RGBA.
pub fn load_image(path: &Path) -> Result<RasterImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
        _ => AssetError::Io(e),
    })?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    Ok(image.into())
}

/// Runs `load`, turning a panic into [`AssetError::Panicked`] so the countdown still moves.
fn load_guarded<L>(load: &L, path: &Path) -> Result<RasterImage, AssetError>
where
    L: Fn(&Path) -> Result<RasterImage, AssetError>,
{
    panic::catch_unwind(AssertUnwindSafe(|| load(path)))
        .unwrap_or_else(|payload| Err(AssetError::Panicked(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    requests: Vec<AssetRequest>,
}

impl AssetLoader {
    pub fn new(requests: Vec<AssetRequest>) -> Self {
        Self { requests }
    }

    /// The player, collectible and portrait sheets named by `config`.
    pub fn from_config(config: &AssetConfig) -> Self {
        let dir = &config.directory;
        Self::new(vec![
            AssetRequest::new(&config.player.key, dir.join(&config.player.file)),
            AssetRequest::new(&config.collectible.key, dir.join(&config.collectible.file)),
            AssetRequest::new(&config.portraits.key, dir.join(&config.portraits.file)),
        ])
    }

    pub fn requests(&self) -> &[AssetRequest] {
        &self.requests
    }

    /// Loads every request in parallel and hands the results to `on_ready` once all have
    /// settled. Returns after `on_ready` has run.
    pub fn load_all<F>(&self, on_ready: F)
    where
        F: FnOnce(LoadedAssets) + Send,
    {
        self.load_all_with(load_image, on_ready);
    }

    /// [`load_all`](Self::load_all) with a custom decoder. A decoder that panics counts as a
    /// failed key.
    pub fn load_all_with<L, F>(&self, load: L, on_ready: F)
    where
        L: Fn(&Path) -> Result<RasterImage, AssetError> + Sync,
        F: FnOnce(LoadedAssets) + Send,
    {
        let results = Mutex::new(LoadedAssets::default());
        let remaining = AtomicUsize::new(self.requests.len());
        let on_ready = Mutex::new(Some(on_ready));

        let fire = || {
            if let Some(callback) = on_ready.lock().take() {
                let loaded = std::mem::take(&mut *results.lock());
                info!(
                    loaded = loaded.len(),
                    failed = loaded.failed().len(),
                    "Assets settled"
                );
                callback(loaded);
            }
        };

        if self.requests.is_empty() {
            fire();
            return;
        }

        thread::scope(|scope| {
            for request in &self.requests {
                let (fire, results, remaining, load) = (&fire, &results, &remaining, &load);
                scope.spawn(move || {
                    let outcome = load_guarded(load, &request.path);
                    {
                        let mut results = results.lock();
                        match outcome {
                            Ok(image) => {
                                debug!(
                                    key = %request.key,
                                    width = image.width(),
                                    height = image.height(),
                                    "Loaded sheet"
                                );
                                results.insert(request.key.clone(), image);
                            }
                            Err(e) => {
                                warn!(
                                    key = %request.key,
                                    path = %request.path.display(),
                                    error = %e,
                                    "Sheet failed to load"
                                );
                                results.mark_failed(request.key.clone());
                            }
                        }
                    }
                    if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                        fire();
                    }
                });
            }
        });
    }

    /// Convenience wrapper over [`load_all`](Self::load_all) that returns the results.
    pub fn load_blocking(&self) -> LoadedAssets {
        let slot = Mutex::new(None);
        self.load_all(|loaded| *slot.lock() = Some(loaded));
        slot.into_inner().unwrap_or_default()
    }
}
