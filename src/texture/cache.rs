//! Per-key memo of decoded sheets and their frame sources.
//!
//! Segmentation scans every pixel of a sheet, so it runs once per key at load time and
//! never on the draw path.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::texture::animated::FrameAnimator;
use crate::texture::density::scan;
use crate::texture::grid::{DetectedGrid, GridParams};
use crate::texture::raster::RasterImage;
use crate::texture::sprite::FrameSource;
use crate::texture::valley::{segment_strip, ValleyParams};

/// How a sheet's frame boundaries are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segmentation {
    /// Fixed cells; no pixel scan.
    Uniform { columns: usize, rows: usize },
    /// Gap detection on both axes, with a uniform fallback.
    Grid {
        params: GridParams,
        columns: usize,
        rows: usize,
    },
    /// Valley detection for a strip of exactly `count` frames.
    Portraits { count: usize, params: ValleyParams },
}

/// A decoded sheet (if it loaded) with its resolved frame source.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub image: Option<Arc<RasterImage>>,
    pub source: FrameSource,
}

impl Sheet {
    pub fn animator(&self, fps: f32) -> FrameAnimator {
        FrameAnimator::new(self.image.clone(), self.source.clone(), fps)
    }
}

#[derive(Debug, Default)]
pub struct SheetCache {
    sheets: HashMap<String, Sheet>,
    detections: usize,
}

impl SheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized sheet for `key`, segmenting it on first use.
    pub fn get_or_segment(&mut self, key: &str, image: Option<Arc<RasterImage>>, mode: Segmentation) -> &Sheet {
        if !self.sheets.contains_key(key) {
            let source = match image.as_deref() {
                Some(image) => {
                    self.detections += 1;
                    segment(key, image, mode)
                }
                None => fallback_source(mode),
            };
            self.sheets.insert(key.to_string(), Sheet { image, source });
        }
        &self.sheets[key]
    }

    pub fn get(&self, key: &str) -> Option<&Sheet> {
        self.sheets.get(key)
    }

    /// Number of pixel scans performed so far.
    pub fn detections(&self) -> usize {
        self.detections
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

fn fallback_source(mode: Segmentation) -> FrameSource {
    match mode {
        Segmentation::Uniform { columns, rows } | Segmentation::Grid { columns, rows, .. } => {
            FrameSource::uniform(columns, rows)
        }
        Segmentation::Portraits { count, .. } => FrameSource::uniform(count, 1),
    }
}

fn segment(key: &str, image: &RasterImage, mode: Segmentation) -> FrameSource {
    match mode {
        Segmentation::Uniform { columns, rows } => FrameSource::uniform(columns, rows),
        Segmentation::Grid { params, columns, rows } => match DetectedGrid::detect(&scan(image), params) {
            Some(grid) => {
                debug!(
                    key,
                    columns = grid.columns().len(),
                    rows = grid.rows().len(),
                    "Detected sheet grid"
                );
                FrameSource::Detected(grid)
            }
            None => {
                warn!(key, columns, rows, "Grid detection found no runs, using uniform grid");
                FrameSource::uniform(columns, rows)
            }
        },
        Segmentation::Portraits { count, params } => {
            let strip = segment_strip(image, count, params);
            match strip.to_grid() {
                Some(grid) => FrameSource::Detected(grid),
                None => FrameSource::uniform(count, 1),
            }
        }
    }
}
