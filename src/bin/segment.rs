//! Prints the frame boundaries heartwalk would infer for a spritesheet.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use heartwalk::asset::load_image;
use heartwalk::logging::setup_logging;
use heartwalk::texture::density::scan;
use heartwalk::texture::grid::{DetectedGrid, GridParams};
use heartwalk::texture::valley::{segment_strip, ValleyParams};

#[derive(Parser, Debug)]
#[command(version, about = "Inspect spritesheet segmentation")]
struct Args {
    /// PNG spritesheet to inspect.
    sheet: PathBuf,

    /// Treat the sheet as a strip of exactly N portraits.
    #[arg(long, value_name = "N")]
    portraits: Option<usize>,

    #[arg(long, default_value_t = GridParams::default().min_density)]
    min_density: u32,

    #[arg(long, default_value_t = GridParams::default().min_gap)]
    min_gap: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(false)?;

    let image = load_image(&args.sheet).with_context(|| format!("loading {}", args.sheet.display()))?;
    println!("{}: {}x{}", args.sheet.display(), image.width(), image.height());

    if let Some(count) = args.portraits {
        let strip = segment_strip(&image, count, ValleyParams::default());
        println!(
            "{} portraits ({})",
            strip.len(),
            if strip.is_uniform() { "uniform fallback" } else { "valleys" }
        );
        for (i, frame) in strip.frames().iter().enumerate() {
            println!("  #{i}: x={} width={}", frame.x, frame.width);
        }
        return Ok(());
    }

    let params = GridParams {
        min_density: args.min_density,
        min_gap: args.min_gap,
    };
    match DetectedGrid::detect(&scan(&image), params) {
        Some(grid) => {
            println!("{} columns, {} rows", grid.columns().len(), grid.rows().len());
            for (i, run) in grid.columns().iter().enumerate() {
                println!("  column {i}: {}..{}", run.start, run.end());
            }
            for (i, run) in grid.rows().iter().enumerate() {
                println!("  row {i}: {}..{}", run.start, run.end());
            }
        }
        None => println!("no content runs found"),
    }
    Ok(())
}
