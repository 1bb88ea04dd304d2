// src/config.rs

//! Defines the configuration structures for the painter.
//!
//! Every struct deserializes from JSON with `#[serde(default)]`, so a config
//! file only needs to name the settings it changes. The defaults reproduce the
//! reference deployment: an 800x800 canvas and a 300px figure.

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::{NamedColor, Rgba};

/// Environment variable naming a JSON config file for the binary.
pub const CONFIG_ENV_VAR: &str = "PAINTER_CONFIG";

/// Process-wide configuration, loaded once on first access.
///
/// Only the binary reads this; library entry points take explicit values.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Size of both canvas buffers.
    pub canvas: CanvasConfig,
    /// Figure geometry.
    pub figure: FigureConfig,
    /// Actual RGBA values behind the named colors.
    pub colors: ColorScheme,
}

impl Config {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Loads from `$PAINTER_CONFIG` if set, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            info!("Configuration loaded (using default).");
            return Config::default();
        };
        match Config::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}. Using default configuration.", e);
                Config::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            anyhow::bail!(
                "canvas size must be non-zero, got {}x{}",
                self.canvas.width,
                self.canvas.height
            );
        }
        let max_px = i32::MAX as u32;
        if self.canvas.width > max_px || self.canvas.height > max_px {
            anyhow::bail!(
                "canvas size must not exceed {} pixels per side, got {}x{}",
                max_px,
                self.canvas.width,
                self.canvas.height
            );
        }
        if self.figure.size > max_px {
            anyhow::bail!(
                "figure.size must not exceed {} pixels, got {}",
                max_px,
                self.figure.size
            );
        }
        if self.figure.bar_divisor == 0 {
            anyhow::bail!("figure.bar_divisor must be non-zero");
        }
        Ok(())
    }
}

// --- Canvas Configuration ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 800,
            height: 800,
        }
    }
}

// --- Figure Configuration ---

/// The figure is drawn at a fixed on-screen size regardless of canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Edge length of the figure's bounding square in pixels.
    pub size: u32,
    /// Bar thickness is `size / bar_divisor`.
    pub bar_divisor: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            size: 300,
            bar_divisor: 5,
        }
    }
}

// --- Color Scheme Configuration ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub black: Rgba,
    pub white: Rgba,
    pub green: Rgba,
    pub yellow: Rgba,
}

impl ColorScheme {
    pub fn resolve(&self, color: NamedColor) -> Rgba {
        match color {
            NamedColor::Black => self.black,
            NamedColor::White => self.white,
            NamedColor::Green => self.green,
            NamedColor::Yellow => self.yellow,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            black: NamedColor::Black.to_rgba(),
            white: NamedColor::White.to_rgba(),
            green: NamedColor::Green.to_rgba(),
            yellow: NamedColor::Yellow.to_rgba(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{ "canvas": { "width": 640 } }"#).unwrap();
        assert_eq!(config.canvas.width, 640);
        assert_eq!(config.canvas.height, 800);
        assert_eq!(config.figure, FigureConfig::default());
        assert_eq!(config.colors.resolve(NamedColor::Green), Rgba::GREEN);
    }

    #[test]
    fn color_override_from_json() {
        let config: Config = serde_json::from_str(
            r#"{ "colors": { "white": { "r": 240, "g": 240, "b": 240, "a": 255 } } }"#,
        )
        .unwrap();
        assert_eq!(config.colors.white, Rgba::opaque(240, 240, 240));
        assert_eq!(config.colors.black, Rgba::BLACK);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let mut config = Config::default();
        config.canvas.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn sizes_beyond_pixel_range_are_rejected() {
        let mut config = Config::default();
        config.canvas.width = i32::MAX as u32 + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.figure.size = u32::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.canvas.height = i32::MAX as u32;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::load(Path::new("/nonexistent/painter.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
