// src/display/png_sink.rs
//! Writes committed frames to disk as PNG files.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::painter::Framebuffer;

/// Writes every frame it is given into one directory as `frame-NNNN.png`.
pub struct PngSink {
    dir: PathBuf,
}

impl PngSink {
    /// Creates the directory if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create frame directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, sequence: u64) -> PathBuf {
        self.dir.join(format!("frame-{:04}.png", sequence))
    }

    /// Writes `surface` as frame `sequence` and returns the file path.
    pub fn write(&self, sequence: u64, surface: &Framebuffer) -> Result<PathBuf> {
        let path = self.path_for(sequence);
        write_png(&path, surface)?;
        debug!("PngSink: wrote {}", path.display());
        Ok(path)
    }
}

/// Encodes `surface` as an 8-bit RGBA PNG at `path`.
pub fn write_png(path: &Path, surface: &Framebuffer) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), surface.width(), surface.height());
    encoder.set_color(png::ColorType::RGBA);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to write PNG header to {}", path.display()))?;
    writer
        .write_image_data(surface.as_bytes())
        .with_context(|| format!("Failed to write PNG data to {}", path.display()))?;
    Ok(())
}
