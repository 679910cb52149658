//! Column and row occupancy profiles of a raster image.

use crate::constants::{ALPHA_THRESHOLD, WHITE_THRESHOLD};
use crate::texture::raster::RasterImage;

/// Per-axis counts of content pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DensityProfile {
    /// One entry per image column.
    pub columns: Vec<u32>,
    /// One entry per image row.
    pub rows: Vec<u32>,
}

/// Returns true when a pixel carries character art.
///
/// Transparent padding and flat near-white backgrounds both count as empty.
#[inline]
pub fn is_content([r, g, b, a]: [u8; 4]) -> bool {
    a > ALPHA_THRESHOLD && (r < WHITE_THRESHOLD || g < WHITE_THRESHOLD || b < WHITE_THRESHOLD)
}

/// Scans every pixel once and builds both density profiles.
pub fn scan(image: &RasterImage) -> DensityProfile {
    let width = image.width() as usize;
    let mut columns = vec![0u32; width];
    let mut rows = vec![0u32; image.height() as usize];

    if width == 0 {
        return DensityProfile { columns, rows };
    }

    for (y, row) in image.pixels().chunks_exact(width * 4).enumerate() {
        for (x, px) in row.chunks_exact(4).enumerate() {
            if is_content([px[0], px[1], px[2], px[3]]) {
                columns[x] += 1;
                rows[y] += 1;
            }
        }
    }

    DensityProfile { columns, rows }
}

/// Column profile only, for strips segmented along one axis.
pub fn scan_columns(image: &RasterImage) -> Vec<u32> {
    scan(image).columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_is_not_content() {
        assert!(!is_content([0, 0, 0, 30]));
        assert!(is_content([0, 0, 0, 31]));
    }

    #[test]
    fn test_near_white_is_not_content() {
        assert!(!is_content([235, 240, 255, 255]));
        assert!(is_content([234, 240, 255, 255]));
    }

    #[test]
    fn test_scan_counts_per_axis() {
        let mut image = RasterImage::filled(4, 3, [255, 255, 255, 255]);
        image.put_pixel(1, 0, [10, 10, 10, 255]);
        image.put_pixel(1, 2, [10, 10, 10, 255]);
        image.put_pixel(3, 2, [10, 10, 10, 255]);

        let profile = scan(&image);
        assert_eq!(profile.columns, vec![0, 2, 0, 1]);
        assert_eq!(profile.rows, vec![1, 0, 2]);
    }
}
