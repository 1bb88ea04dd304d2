// src/output.rs

//! Headless frame sink: writes every delivered frame to a numbered PNG.

use crate::canvas::Framebuffer;
use crate::pipeline::Receiver;
use anyhow::{Context, Result};
use log::{error, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub struct PngFrameWriter {
    dir: PathBuf,
    next_index: usize,
}

impl PngFrameWriter {
    /// Creates `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self { dir, next_index: 0 })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame-{:04}.png", index))
    }

    fn write_frame(&self, path: &Path, frame: &Framebuffer) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width(), frame.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .context("Failed to write PNG header")?;
        writer
            .write_image_data(frame.pixels())
            .context("Failed to write PNG data")?;
        writer.finish().context("Failed to finish PNG stream")?;
        Ok(())
    }
}

impl Receiver<Framebuffer> for PngFrameWriter {
    fn on_frame(&mut self, canvas: &Framebuffer) {
        let path = self.frame_path(self.next_index);
        self.next_index += 1;
        match self.write_frame(&path, canvas) {
            Ok(()) => info!("PngFrameWriter: Wrote {}", path.display()),
            Err(e) => error!("PngFrameWriter: {:#}", e),
        }
    }
}
