//! Example: Summarize a SEG-Y file
//!
//! Run with: cargo run --example segy_info -- <file.sgy> [inline-byte crossline-byte]
//!
//! Without arguments a small synthetic survey is created and summarized.
//! Set `RUST_LOG=segy=debug` for scan details.

use anyhow::{Context, Result};
use ndarray::Array3;
use segy::{SegyConfig, SegyFile, SegyWriter, Shape};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn synthetic(dir: &tempfile::TempDir) -> Result<PathBuf> {
    let path = dir.path().join("synthetic.sgy");
    let shape = Shape::new(20, 15, 250)?;
    let volume = Array3::from_shape_fn(shape.dims(), |(il, xl, z)| {
        ((z as f32 * 0.1) + il as f32 * 0.05 - xl as f32 * 0.02).sin()
    });

    let config = SegyConfig::new()
        .with_min_lines(1000, 2000)
        .with_origin(450_000.0, 6_780_000.0)
        .with_sample_interval(2000);
    SegyWriter::with_config(shape, config)?.write(&path, volume.view())?;
    Ok(path)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "segy=info".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let scratch = tempfile::tempdir()?;

    let path = match args.first() {
        Some(path) => PathBuf::from(path),
        None => synthetic(&scratch)?,
    };

    let mut config = SegyConfig::new();
    if let [_, iline, xline, ..] = args.as_slice() {
        config = config.with_line_locations(
            iline.parse().context("inline byte location")?,
            xline.parse().context("crossline byte location")?,
        );
    }

    let mut segy = SegyFile::open_with_config(&path, config)
        .with_context(|| format!("opening {}", path.display()))?;

    println!("{}", segy.textual_header()?);
    println!();

    segy.scan().context("scanning geometry")?;
    println!("{}", segy.meta_info()?);

    let shape = segy.shape()?;
    let inline = segy.read_inline(shape.n_inline / 2)?;
    let peak = inline.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
    println!(
        "middle inline: {} x {} samples, peak amplitude {peak}",
        inline.nrows(),
        inline.ncols()
    );

    segy.close();
    Ok(())
}
