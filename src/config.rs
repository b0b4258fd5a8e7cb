// src/config.rs

//! Defines the configuration structures for the painter.
//!
//! Every section can be deserialized from a JSON file and falls back to its
//! defaults for missing fields, so a config file only needs to name the
//! settings it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

use crate::color::{Color, NamedColor};
use crate::painter::QueueCapacity;

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for a painter loop and its host.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Frame surface settings.
    pub surface: SurfaceConfig,
    /// Operation queue settings.
    pub queue: QueueConfig,
    /// Initial canvas look.
    pub canvas: CanvasConfig,
    /// Figure appearance.
    pub figure: FigureConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Config: loaded from {}", path.display());
        Ok(config)
    }

    /// Rejects values the painter cannot draw with.
    pub fn validate(&self) -> Result<()> {
        let scale = self.figure.scale;
        if !scale.is_finite() || scale <= 0.0 {
            bail!("figure.scale must be a positive number, got {}", scale);
        }
        Ok(())
    }
}

// --- Surface Configuration ---

/// Size of every committed frame and the allocation budget of the
/// in-memory surface factory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    /// Largest surface, in pixels, the in-memory factory agrees to allocate.
    pub max_pixels: u64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        SurfaceConfig {
            width: 600,
            height: 600,
            max_pixels: 4096 * 4096,
        }
    }
}

// --- Queue Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct QueueConfig {
    /// Number of operations that can wait in the queue.
    /// `0` makes every submit a rendezvous with the painter loop.
    pub capacity: usize,
}

impl QueueConfig {
    pub fn capacity(&self) -> QueueCapacity {
        QueueCapacity::from(self.capacity)
    }
}

// --- Canvas Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Background colour the loop starts with.
    pub initial_background: Color,
    /// Colour used to paint the background rectangle.
    pub rect_color: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            initial_background: NamedColor::White.to_color(),
            rect_color: NamedColor::Black.to_color(),
        }
    }
}

// --- Figure Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FigureConfig {
    pub color: Color,
    /// Multiplier applied to the figure's pixel geometry.
    pub scale: f32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            color: NamedColor::Yellow.to_color(),
            scale: 1.0,
        }
    }
}
