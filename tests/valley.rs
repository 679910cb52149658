mod common;

use heartwalk::texture::raster::RasterImage;
use heartwalk::texture::valley::{segment_strip, ValleyParams};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use common::{sheet_with_blocks, strip_from_profile, touching_faces, WHITE};

#[test]
fn test_touching_faces_split_at_valleys() {
    let strip = segment_strip(&touching_faces(4, 150), 4, ValleyParams::default());

    assert_that(&strip.is_uniform()).is_false();
    assert_eq!(strip.boundaries(), &[0, 150, 300, 450, 600]);
}

#[test]
fn test_frames_span_full_height() {
    let image = touching_faces(3, 150);
    let strip = segment_strip(&image, 3, ValleyParams::default());
    for frame in strip.frames() {
        assert_that(&frame.y).is_equal_to(0);
        assert_that(&frame.height).is_equal_to(image.height());
    }
}

#[test]
fn test_extra_valleys_keep_only_the_deepest() {
    // Four seams, two shallow and two deep; three portraits need only the deep ones
    let seams = [(150u32, 60.0f32), (300, 120.0), (450, 60.0), (600, 120.0)];
    let image = strip_from_profile(750, 150, move |x| {
        let dip: f32 = seams
            .iter()
            .map(|&(seam, depth)| depth * (1.0 - x.abs_diff(seam) as f32 / 75.0).max(0.0))
            .sum();
        (150.0 - dip).round() as u32
    });
    let strip = segment_strip(&image, 3, ValleyParams::default());

    assert_that(&strip.is_uniform()).is_false();
    assert_eq!(strip.boundaries(), &[0, 300, 600, 750]);
}

#[test]
fn test_single_blob_falls_back_to_uniform() {
    let image = strip_from_profile(200, 120, |x| 101 - x.abs_diff(100).min(100));
    let strip = segment_strip(&image, 3, ValleyParams::default());

    assert_that(&strip.is_uniform()).is_true();
    assert_eq!(strip.boundaries(), &[0, 66, 133, 200]);
}

#[test]
fn test_all_white_strip_still_yields_every_frame() {
    let image = RasterImage::filled(300, 50, WHITE);
    for count in 1..=6 {
        let strip = segment_strip(&image, count, ValleyParams::default());
        assert_that(&strip.len()).is_equal_to(count);

        let bounds = strip.boundaries();
        assert_that(&bounds[0]).is_equal_to(0);
        assert_that(&bounds[count]).is_equal_to(300);
        assert!(bounds.windows(2).all(|w| w[0] < w[1]), "{bounds:?}");
    }
}

#[test]
fn test_strip_becomes_one_row_grid() {
    let strip = segment_strip(&touching_faces(4, 150), 4, ValleyParams::default());
    let grid = strip.to_grid().expect("non-empty strip");
    assert_that(&grid.columns().len()).is_equal_to(4);
    assert_that(&grid.rows().len()).is_equal_to(1);
    assert_that(&grid.rows()[0].length).is_equal_to(150);
}

#[test]
fn test_narrow_content_widens_to_the_whole_strip() {
    // One ink column smooths into an 11-column content box, too narrow for 16 frames.
    let image = sheet_with_blocks(64, 20, &[(30, 0, 1, 20)]);
    let strip = segment_strip(&image, 16, ValleyParams::default());

    assert_that(&strip.is_uniform()).is_true();
    let expected: Vec<usize> = (0..=16).map(|i| i * 4).collect();
    assert_eq!(strip.boundaries(), expected.as_slice());
    assert!(strip.frames().iter().all(|frame| frame.width > 0));
    assert_that(&strip.to_grid().is_some()).is_true();
}

#[test]
fn test_frames_never_collapse_when_the_strip_fits_them() {
    let ink = [20, 20, 20, 255];
    for width in 6..=20 {
        let image = RasterImage::filled(width, 4, ink);
        let strip = segment_strip(&image, 6, ValleyParams::default());
        assert!(
            strip.frames().iter().all(|frame| frame.width > 0),
            "width {width}: {:?}",
            strip.boundaries()
        );
    }
}

#[test]
fn test_strip_narrower_than_its_frames_has_no_grid() {
    let strip = segment_strip(&RasterImage::filled(4, 4, [20, 20, 20, 255]), 6, ValleyParams::default());
    assert_that(&strip.len()).is_equal_to(6);
    assert_that(&strip.to_grid().is_none()).is_true();
}
