//! Valley-based segmentation for portrait strips with a known frame count.
//!
//! Adjacent faces in a portrait strip often touch, so there is no empty gap to split
//! on. Instead the column density is smoothed and the deepest local minima inside the
//! content box are taken as separators. Frame widths may differ; the count never does.

use tracing::{debug, warn};

use crate::constants::{
    VALLEY_EDGE_MARGIN, VALLEY_MIN_SPACING, VALLEY_NEAR_ZERO, VALLEY_NEIGHBOR_RADIUS, VALLEY_SMOOTH_RADIUS,
};
use crate::texture::density::scan_columns;
use crate::texture::grid::{ContentRun, DetectedGrid, Runs};
use crate::texture::raster::RasterImage;
use crate::texture::sprite::FrameRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValleyParams {
    pub smooth_radius: usize,
    pub neighbor_radius: usize,
    pub min_spacing: usize,
    pub edge_margin: usize,
}

impl Default for ValleyParams {
    fn default() -> Self {
        Self {
            smooth_radius: VALLEY_SMOOTH_RADIUS,
            neighbor_radius: VALLEY_NEIGHBOR_RADIUS,
            min_spacing: VALLEY_MIN_SPACING,
            edge_margin: VALLEY_EDGE_MARGIN,
        }
    }
}

/// Frame boundaries of a portrait strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortraitStrip {
    /// `count + 1` ascending column positions: content start, separators, content end.
    boundaries: Vec<usize>,
    height: u32,
    /// True when too few valleys were found and slices are evenly spaced.
    uniform: bool,
}

impl PortraitStrip {
    pub fn len(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// One rectangle per portrait, spanning the full strip height.
    pub fn frames(&self) -> Vec<FrameRect> {
        self.boundaries
            .windows(2)
            .map(|w| FrameRect::new(w[0] as u32, 0, (w[1] - w[0]) as u32, self.height))
            .collect()
    }

    /// Expresses the strip as a one-row grid so it animates like any other sheet.
    ///
    /// Returns `None` for an empty strip or one with a zero-width slice.
    pub fn to_grid(&self) -> Option<DetectedGrid> {
        if self.boundaries.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }
        let columns: Runs = self
            .boundaries
            .windows(2)
            .map(|w| ContentRun::new(w[0], w[1] - w[0]))
            .collect();
        let rows: Runs = [ContentRun::new(0, self.height as usize)].into_iter().collect();
        DetectedGrid::from_runs(columns, rows)
    }
}

/// Symmetric moving average, clipped at the array ends.
pub fn smooth(density: &[u32], radius: usize) -> Vec<f32> {
    let n = density.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(n);
            let sum: u32 = density[lo..hi].iter().sum();
            sum as f32 / (hi - lo) as f32
        })
        .collect()
}

/// The `[start, end)` span between the first and last non-empty smoothed columns.
pub fn content_bounds(smoothed: &[f32]) -> Option<(usize, usize)> {
    let start = smoothed.iter().position(|&v| v > VALLEY_NEAR_ZERO)?;
    let last = smoothed.iter().rposition(|&v| v > VALLEY_NEAR_ZERO)?;
    Some((start, last + 1))
}

/// Local minima of `smoothed` inside `[start + margin, end - margin)`, left to right.
///
/// A column qualifies when no column within `neighbor_radius` is strictly lower and it
/// lies more than `min_spacing` past the previously accepted minimum.
pub fn find_valleys(smoothed: &[f32], start: usize, end: usize, params: ValleyParams) -> Vec<usize> {
    let lo = start + params.edge_margin;
    let hi = end.saturating_sub(params.edge_margin);
    let mut valleys: Vec<usize> = Vec::new();

    for x in lo..hi {
        let from = x.saturating_sub(params.neighbor_radius);
        let to = (x + params.neighbor_radius + 1).min(smoothed.len());
        let value = smoothed[x];

        if smoothed[from..to].iter().any(|&n| n < value) {
            continue;
        }
        if valleys.last().is_some_and(|&prev| x - prev <= params.min_spacing) {
            continue;
        }
        valleys.push(x);
    }

    valleys
}

/// Keeps the `wanted` deepest valleys, returned in position order.
///
/// Ties keep their left-to-right order.
pub fn select_deepest(mut valleys: Vec<usize>, smoothed: &[f32], wanted: usize) -> Vec<usize> {
    valleys.sort_by(|&a, &b| smoothed[a].total_cmp(&smoothed[b]));
    valleys.truncate(wanted);
    valleys.sort_unstable();
    valleys
}

/// Splits a strip into exactly `count` frames.
///
/// Degrades to evenly spaced slices of the content box (or the whole image when it has
/// no content at all) instead of failing.
pub fn segment_strip(image: &RasterImage, count: usize, params: ValleyParams) -> PortraitStrip {
    let smoothed = smooth(&scan_columns(image), params.smooth_radius);
    let (start, end) = content_bounds(&smoothed).unwrap_or((0, image.width() as usize));
    let wanted = count.saturating_sub(1);

    let valleys = find_valleys(&smoothed, start, end, params);
    let (start, end, separators, uniform) = if valleys.len() >= wanted {
        (start, end, select_deepest(valleys, &smoothed, wanted), false)
    } else {
        warn!(
            found = valleys.len(),
            wanted, "Too few portrait valleys, falling back to uniform slices"
        );
        // A content box narrower than one column per frame would repeat boundaries.
        let (start, end) = if end - start >= count {
            (start, end)
        } else {
            (0, image.width() as usize)
        };
        let span = end - start;
        (start, end, (1..count).map(|i| start + i * span / count).collect(), true)
    };

    let mut boundaries = Vec::with_capacity(count + 1);
    if count > 0 {
        boundaries.push(start);
        boundaries.extend(separators);
        boundaries.push(end);
    }

    debug!(count, start, end, uniform, "Segmented portrait strip");
    PortraitStrip {
        boundaries,
        height: image.height(),
        uniform,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_is_clipped_average() {
        let smoothed = smooth(&[0, 3, 0], 1);
        assert_eq!(smoothed, vec![1.5, 1.0, 1.5]);
    }

    #[test]
    fn test_content_bounds_trims_empty_edges() {
        assert_eq!(content_bounds(&[0.0, 0.2, 4.0, 2.0, 0.0]), Some((2, 4)));
        assert_eq!(content_bounds(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_select_deepest_reorders_by_position() {
        let smoothed = vec![5.0, 1.0, 5.0, 0.5, 5.0, 3.0];
        let selected = select_deepest(vec![1, 3, 5], &smoothed, 2);
        assert_eq!(selected, vec![1, 3]);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let image = RasterImage::filled(10, 10, [0, 0, 0, 255]);
        let strip = segment_strip(&image, 0, ValleyParams::default());
        assert!(strip.is_empty());
        assert!(strip.frames().is_empty());
    }
}
