use glam::UVec2;

use crate::constants::BLEED_TRIM;
use crate::texture::grid::DetectedGrid;

/// A source rectangle within a spritesheet, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where an animator's frame rectangles come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSource {
    /// Equal cells dividing the sheet extents.
    Uniform { columns: usize, rows: usize },
    /// Boundaries inferred from pixel density.
    Detected(DetectedGrid),
}

impl FrameSource {
    pub fn uniform(columns: usize, rows: usize) -> Self {
        FrameSource::Uniform {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        match self {
            FrameSource::Uniform { columns, .. } => (*columns).max(1),
            FrameSource::Detected(grid) => grid.columns().len(),
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            FrameSource::Uniform { rows, .. } => (*rows).max(1),
            FrameSource::Detected(grid) => grid.rows().len(),
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, FrameSource::Detected(_))
    }

    /// Maps a `(frame, row)` pair to a source rectangle.
    ///
    /// Out-of-range indices clamp to the last valid column/row. Uniform cells lose
    /// [`BLEED_TRIM`] pixels on their trailing edges so neighbouring frames never show.
    pub fn resolve(&self, sheet: UVec2, frame: usize, row: usize) -> FrameRect {
        let column = frame.min(self.columns() - 1);
        let row = row.min(self.rows() - 1);

        match self {
            FrameSource::Uniform { .. } => {
                let cell_w = sheet.x / self.columns() as u32;
                let cell_h = sheet.y / self.rows() as u32;
                FrameRect::new(
                    column as u32 * cell_w,
                    row as u32 * cell_h,
                    trim_trailing(cell_w),
                    trim_trailing(cell_h),
                )
            }
            FrameSource::Detected(grid) => {
                let c = grid.columns()[column];
                let r = grid.rows()[row];
                FrameRect::new(c.start as u32, r.start as u32, c.length as u32, r.length as u32)
            }
        }
    }
}

fn trim_trailing(extent: u32) -> u32 {
    if extent > BLEED_TRIM * 2 {
        extent - BLEED_TRIM
    } else {
        extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_never_has_zero_cells() {
        let source = FrameSource::uniform(0, 0);
        assert_eq!(source.columns(), 1);
        assert_eq!(source.rows(), 1);
    }

    #[test]
    fn test_trim_skips_tiny_cells() {
        assert_eq!(trim_trailing(4), 4);
        assert_eq!(trim_trailing(5), 5 - BLEED_TRIM);
    }
}
