// src/core/visualization/spectrogram.rs
//
// PNG rendering of detection windows

use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

use crate::core::analysis::DetectionWindow;
use crate::detection::Detection;
use crate::error::Result;

/// Width of the dB colorbar strip on the right edge, pixels
const COLORBAR_WIDTH: u32 = 16;
const COLORBAR_GAP: u32 = 4;

/// Plot configuration
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub min_db: f64,
    pub max_db: f64,
    pub colormap: Colormap,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 300,
            min_db: -40.0,
            max_db: 0.0,
            colormap: Colormap::default(),
        }
    }
}

/// Color map for spectrogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    Viridis,
    Grayscale,
}

impl Default for Colormap {
    fn default() -> Self {
        Self::Viridis
    }
}

impl Colormap {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "viridis" => Some(Self::Viridis),
            "gray" | "grayscale" => Some(Self::Grayscale),
            _ => None,
        }
    }

    /// Map a value in [0, 1] to a color
    pub fn color(&self, value: f64) -> Rgb<u8> {
        let v = value.clamp(0.0, 1.0);
        match self {
            Colormap::Grayscale => {
                let g = (v * 255.0).round() as u8;
                Rgb([g, g, g])
            }
            Colormap::Viridis => {
                let r = (68.0 + v * (253.0 - 68.0)) as u8;
                let g = (1.0 + v * (231.0 - 1.0)) as u8;
                let b = (84.0 + v * (37.0 - 84.0) + (1.0 - v) * v * 150.0) as u8;
                Rgb([r, g, b])
            }
        }
    }
}

/// Render the clipped power of a detection window, low frequencies at the
/// bottom and a dB colorbar on the right.
pub fn render_window(window: &DetectionWindow, config: &PlotConfig) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::from_pixel(config.width, config.height, Rgb([255, 255, 255]));

    let rows = window.cropped_power.len();
    let cols = window.cropped_power.first().map_or(0, |r| r.len());
    let plot_width = config.width.saturating_sub(COLORBAR_WIDTH + COLORBAR_GAP);
    let range = config.max_db - config.min_db;
    let normalize = |db: f64| (db - config.min_db) / range;

    if rows > 0 && cols > 0 && plot_width > 0 {
        let x_scale = cols as f64 / plot_width as f64;
        let y_scale = rows as f64 / config.height as f64;
        for y in 0..config.height {
            let row = rows - 1 - ((y as f64 * y_scale) as usize).min(rows - 1);
            for x in 0..plot_width {
                let col = ((x as f64 * x_scale) as usize).min(cols - 1);
                let db = window.cropped_power[row][col];
                img.put_pixel(x, y, config.colormap.color(normalize(db)));
            }
        }
    }

    let bar_start = config.width.saturating_sub(COLORBAR_WIDTH);
    for y in 0..config.height {
        let level = 1.0 - y as f64 / (config.height.max(2) - 1) as f64;
        for x in bar_start..config.width {
            img.put_pixel(x, y, config.colormap.color(level));
        }
    }

    img
}

/// Render a detection window and save it as an image
pub fn render_detection(window: &DetectionWindow, config: &PlotConfig, output_path: &Path) -> Result<()> {
    render_window(window, config).save(output_path)?;
    Ok(())
}

/// Output file name for a detection: `<stem>_<seconds>s_class<label>.png`
pub fn detection_file_name(stem: &str, detection: &Detection) -> String {
    format!(
        "{}_{:06.2}s_class{}.png",
        stem,
        detection.center_time(),
        detection.label
    )
}
