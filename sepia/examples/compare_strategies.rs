//! Example: run every sepia strategy over one raster and compare timings.
//!
//! Without arguments a synthetic 1920x1080 gradient is used. With an input
//! image the image is converted to RGB and processed instead; with an output
//! directory the sepia result of every strategy is written there as PNG.
//!
//! Set `SEPIA_CONFIG` to a YAML or JSON file to override the defaults.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example compare_strategies -- [INPUT_IMAGE] [OUTPUT_DIR]
//! ```

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use sepia::{ChannelOrder, Raster, SepiaConfig, Strategy, apply, spawn_transform};
use strum::IntoEnumIterator;

const SYNTHETIC_WIDTH: usize = 1920;
const SYNTHETIC_HEIGHT: usize = 1080;

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("info", "logs");

    let args: Vec<String> = env::args().collect();
    let input = args.get(1).map(PathBuf::from);
    let output_dir = args.get(2).map(PathBuf::from);

    let mut config = match env::var("SEPIA_CONFIG") {
        Ok(path) => SepiaConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        Err(_) => SepiaConfig::default(),
    };
    config.timing = true;

    let raster = match &input {
        Some(path) => load_raster(path)?,
        None => synthetic_raster(SYNTHETIC_WIDTH, SYNTHETIC_HEIGHT)?,
    };
    tracing::info!(
        width = raster.width(),
        height = raster.height(),
        workers = config.worker_count,
        partition = ?config.partition,
        "Raster ready"
    );

    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut reference = raster.clone();
    apply(&mut reference, Strategy::PerPixel, &config)?;

    let mut results = Vec::new();
    for strategy in Strategy::iter() {
        let mut out = raster.clone();
        let report = apply(&mut out, strategy, &config)?;
        let secs = report.elapsed_secs().unwrap_or_default();
        let matches = out == reference;

        tracing::info!(%strategy, secs, matches, "Strategy finished");
        if !matches {
            tracing::warn!(%strategy, "Result differs from the per-pixel reference");
        }

        if let Some(dir) = &output_dir {
            save_raster(&out, &dir.join(format!("sepia_{strategy}.png")))?;
        }
        results.push((strategy, secs));
    }

    // The same transform once more in the background, observed via its completion signal.
    let task = spawn_transform(raster, Strategy::VectorIntThreaded, config.clone())?;
    task.wait();
    let (_, report) = task.join()?;
    tracing::info!(
        secs = report.elapsed_secs().unwrap_or_default(),
        "Background transform finished"
    );

    let baseline = results
        .iter()
        .find(|(strategy, _)| *strategy == Strategy::PerPixel)
        .map(|&(_, secs)| secs)
        .unwrap_or_default();

    println!("\n{:<24} {:>12} {:>10}", "strategy", "seconds", "speedup");
    for (strategy, secs) in &results {
        let speedup = if *secs > 0.0 { baseline / secs } else { 0.0 };
        println!("{:<24} {:>12.6} {:>9.2}x", strategy.to_string(), secs, speedup);
    }

    Ok(())
}

fn load_raster(path: &Path) -> anyhow::Result<Raster> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .to_rgb8();
    let (width, height) = (image.width() as usize, image.height() as usize);
    let raster = Raster::from_bytes(width, height, width * 3, ChannelOrder::Rgb, image.into_raw())?;
    Ok(raster)
}

fn synthetic_raster(width: usize, height: usize) -> anyhow::Result<Raster> {
    let mut raster = Raster::new(width, height, ChannelOrder::Rgb)?;
    for y in 0..height {
        for x in 0..width {
            let b = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let r = ((x + y) % 256) as u8;
            raster.set_pixel(x, y, (b, g, r));
        }
    }
    Ok(raster)
}

fn save_raster(raster: &Raster, path: &Path) -> anyhow::Result<()> {
    if raster.order() != ChannelOrder::Rgb || raster.stride() != raster.width() * 3 {
        bail!("Only packed RGB rasters can be saved");
    }
    let image = image::RgbImage::from_raw(
        raster.width() as u32,
        raster.height() as u32,
        raster.bytes().to_vec(),
    )
    .context("Raster buffer does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved");
    Ok(())
}
