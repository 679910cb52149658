//! Gap-based frame boundary detection.
//!
//! A density profile is split into contiguous runs of content; runs separated by less
//! than a minimum gap are merged so anti-aliasing seams and negative space inside one
//! character do not split it into two frames.

use smallvec::SmallVec;
use tracing::debug;

use crate::constants::{GRID_MIN_DENSITY, GRID_MIN_GAP};
use crate::texture::density::DensityProfile;

/// A half-open span `[start, start + length)` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentRun {
    pub start: usize,
    pub length: usize,
}

impl ContentRun {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// One past the last index of the run.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

pub type Runs = SmallVec<[ContentRun; 8]>;

/// Thresholds for [`detect_runs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridParams {
    /// A run opens when density exceeds this value.
    pub min_density: u32,
    /// Gaps strictly shorter than this are merged away.
    pub min_gap: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            min_density: GRID_MIN_DENSITY,
            min_gap: GRID_MIN_GAP,
        }
    }
}

/// Finds the content runs of a density array.
///
/// Returns an empty list when nothing exceeds the threshold; callers then fall back to
/// a uniform grid.
pub fn detect_runs(density: &[u32], params: GridParams) -> Runs {
    let mut runs = Runs::new();
    let mut open: Option<usize> = None;

    for (i, &value) in density.iter().enumerate() {
        match (open, value > params.min_density) {
            (None, true) => open = Some(i),
            (Some(start), false) => {
                runs.push(ContentRun::new(start, i - start));
                open = None;
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        runs.push(ContentRun::new(start, density.len() - start));
    }

    merge_runs(runs, params.min_gap)
}

/// Merges neighbouring runs whose gap is strictly less than `min_gap`.
pub fn merge_runs(runs: Runs, min_gap: usize) -> Runs {
    let mut merged = Runs::with_capacity(runs.len());

    for run in runs {
        match merged.last_mut() {
            Some(last) if run.start.saturating_sub(last.end()) < min_gap => {
                last.length = run.end().max(last.end()) - last.start;
            }
            _ => merged.push(run),
        }
    }

    merged
}

/// Column and row runs of a spritesheet. Both axes hold at least one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedGrid {
    columns: Runs,
    rows: Runs,
}

impl DetectedGrid {
    /// Builds a grid from explicit runs, or `None` if either axis is empty.
    pub fn from_runs(columns: Runs, rows: Runs) -> Option<Self> {
        if columns.is_empty() || rows.is_empty() {
            return None;
        }
        Some(Self { columns, rows })
    }

    /// Detects runs on both axes of a profile.
    ///
    /// `None` means detection was underdetermined and the caller must use a uniform grid.
    pub fn detect(profile: &DensityProfile, params: GridParams) -> Option<Self> {
        let columns = detect_runs(&profile.columns, params);
        let rows = detect_runs(&profile.rows, params);
        debug!(columns = columns.len(), rows = rows.len(), "Scanned grid runs");
        Self::from_runs(columns, rows)
    }

    pub fn columns(&self) -> &[ContentRun] {
        &self.columns
    }

    pub fn rows(&self) -> &[ContentRun] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_end() {
        assert_eq!(ContentRun::new(3, 4).end(), 7);
    }

    #[test]
    fn test_run_touching_end_of_array_is_closed() {
        let runs = detect_runs(&[0, 0, 5, 5], GridParams { min_density: 0, min_gap: 0 });
        assert_eq!(runs.as_slice(), &[ContentRun::new(2, 2)]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let runs = detect_runs(&[2, 3, 3, 2], GridParams { min_density: 2, min_gap: 0 });
        assert_eq!(runs.as_slice(), &[ContentRun::new(1, 2)]);
    }

    #[test]
    fn test_from_runs_requires_both_axes() {
        let columns: Runs = [ContentRun::new(0, 1)].into_iter().collect();
        assert!(DetectedGrid::from_runs(columns, Runs::new()).is_none());
    }
}
