mod common;

use std::path::PathBuf;

use heartwalk::asset::{load_image, AssetLoader, AssetRequest};
use heartwalk::config::AssetConfig;
use heartwalk::error::AssetError;
use heartwalk::texture::raster::RasterImage;
use speculoos::prelude::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("heartwalk-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &PathBuf, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba(common::INK))
        .save(path)
        .unwrap();
}

#[test]
fn test_loader_settles_with_missing_files() {
    let dir = scratch_dir("missing");
    let good = dir.join("good.png");
    write_png(&good, 12, 6);

    let loader = AssetLoader::new(vec![
        AssetRequest::new("good", &good),
        AssetRequest::new("gone", dir.join("gone.png")),
    ]);
    let loaded = loader.load_blocking();

    let image = loaded.get("good").expect("decoded");
    assert_that(&(image.width(), image.height())).is_equal_to((12, 6));
    assert_that(&image.pixel(0, 0)).is_equal_to(common::INK);
    assert_that(&loaded.get("gone")).is_none();
    assert_that(&loaded.failed().to_vec()).is_equal_to(vec!["gone".to_string()]);
}

#[test]
fn test_continuation_runs_once_after_all_loads() {
    let dir = scratch_dir("once");
    let requests: Vec<_> = (0..5)
        .map(|i| {
            let path = dir.join(format!("{i}.png"));
            write_png(&path, 4, 4);
            AssetRequest::new(format!("sheet{i}"), path)
        })
        .collect();

    let calls = std::sync::atomic::AtomicUsize::new(0);
    AssetLoader::new(requests).load_all(|loaded| {
        assert_eq!(loaded.len(), 5);
        calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    });
    assert_that(&calls.load(std::sync::atomic::Ordering::SeqCst)).is_equal_to(1);
}

#[test]
fn test_undecodable_file_is_a_decode_error() {
    let dir = scratch_dir("garbage");
    let path = dir.join("garbage.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let err = load_image(&path).unwrap_err();
    assert!(matches!(err, AssetError::Decode(_)), "{err:?}");
}

#[test]
fn test_config_names_every_sheet() {
    let loader = AssetLoader::from_config(&AssetConfig::default());
    let keys: Vec<_> = loader.requests().iter().map(|r| r.key.as_str()).collect();
    assert_that(&keys).is_equal_to(vec!["player", "heart", "portraits"]);
    assert_that(&loader.requests()[0].path).is_equal_to(PathBuf::from("assets/player.png"));
}

#[test]
fn test_panicking_decoder_still_settles() {
    let loader = AssetLoader::new(vec![
        AssetRequest::new("fine", "fine.png"),
        AssetRequest::new("boom", "boom.png"),
    ]);

    let calls = std::sync::atomic::AtomicUsize::new(0);
    loader.load_all_with(
        |path| {
            if path.ends_with("boom.png") {
                panic!("decoder blew up");
            }
            Ok(RasterImage::filled(2, 2, common::INK))
        },
        |loaded| {
            assert_that(&loaded.get("fine")).is_some();
            assert_that(&loaded.failed().to_vec()).is_equal_to(vec!["boom".to_string()]);
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        },
    );
    assert_that(&calls.load(std::sync::atomic::Ordering::SeqCst)).is_equal_to(1);
}
