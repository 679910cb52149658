mod common;

use heartwalk::texture::density::scan;
use heartwalk::texture::grid::{detect_runs, merge_runs, ContentRun, DetectedGrid, GridParams, Runs};
use heartwalk::texture::sprite::{FrameRect, FrameSource};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use common::{grid_sheet, sheet_with_blocks};

fn runs(spans: &[(usize, usize)]) -> Runs {
    spans.iter().map(|&(start, length)| ContentRun::new(start, length)).collect()
}

#[test]
fn test_empty_density_has_no_runs() {
    let found = detect_runs(&[0; 32], GridParams::default());
    assert_that(&found.is_empty()).is_true();
}

#[test]
fn test_single_block_is_single_run() {
    let mut density = vec![0u32; 20];
    for value in &mut density[4..9] {
        *value = 3;
    }
    let found = detect_runs(&density, GridParams::default());
    assert_eq!(found.as_slice(), &[ContentRun::new(4, 5)]);
}

#[test]
fn test_gap_below_minimum_merges() {
    // 5-pixel gap with the default minimum of 6
    let merged = merge_runs(runs(&[(0, 10), (15, 10)]), 6);
    assert_eq!(merged.as_slice(), &[ContentRun::new(0, 25)]);
}

#[test]
fn test_gap_equal_to_minimum_does_not_merge() {
    let merged = merge_runs(runs(&[(0, 10), (16, 10)]), 6);
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_chains_across_several_runs() {
    let merged = merge_runs(runs(&[(0, 4), (6, 4), (12, 4), (40, 4)]), 6);
    assert_eq!(merged.as_slice(), &[ContentRun::new(0, 16), ContentRun::new(40, 4)]);
}

#[test]
fn test_grid_sheet_is_detected() {
    let sheet = grid_sheet(4, 3, 16, 8);
    let grid = DetectedGrid::detect(&scan(&sheet), GridParams::default()).expect("content");

    assert_that(&grid.columns().len()).is_equal_to(4);
    assert_that(&grid.rows().len()).is_equal_to(3);
    assert_eq!(grid.columns()[1], ContentRun::new(24, 16));
    assert_eq!(grid.rows()[2], ContentRun::new(48, 16));
}

#[test]
fn test_blank_sheet_is_underdetermined() {
    let sheet = sheet_with_blocks(40, 40, &[]);
    assert_that(&DetectedGrid::detect(&scan(&sheet), GridParams::default())).is_none();
}

#[test]
fn test_near_white_background_is_ignored() {
    let mut sheet = heartwalk::texture::raster::RasterImage::filled(30, 10, [250, 250, 250, 255]);
    for y in 0..10 {
        sheet.put_pixel(12, y, [10, 10, 10, 255]);
    }
    let profile = scan(&sheet);
    assert_eq!(detect_runs(&profile.columns, GridParams::default()).as_slice(), &[ContentRun::new(12, 1)]);
}

#[test]
fn test_detected_source_resolves_exact_rects() {
    let sheet = grid_sheet(3, 2, 10, 6);
    let grid = DetectedGrid::detect(&scan(&sheet), GridParams::default()).expect("content");
    let source = FrameSource::Detected(grid);
    let size = glam::UVec2::new(sheet.width(), sheet.height());

    assert_eq!(source.resolve(size, 2, 1), FrameRect::new(32, 16, 10, 10));
    // Out-of-range indices clamp to the last cell
    assert_eq!(source.resolve(size, 9, 9), FrameRect::new(32, 16, 10, 10));
}

#[test]
fn test_uniform_source_trims_trailing_bleed() {
    let source = FrameSource::uniform(4, 2);
    let rect = source.resolve(glam::UVec2::new(64, 32), 1, 1);
    assert_eq!(rect, FrameRect::new(16, 16, 14, 14));
}
