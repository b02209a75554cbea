//! CLI argument parsing

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{DetectionConfig, FreqBand};
use crate::core::visualization::{Colormap, PlotConfig};

/// Extension of wideband capture files found when walking directories
const CAPTURE_EXTENSION: &str = "dat";

#[derive(Parser, Debug)]
#[command(name = "whistlr")]
#[command(about = "Searches for whistlers in wideband VLF capture (.dat) files")]
pub struct Args {
    /// Capture files or directories containing them
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Classifier weight file
    #[arg(short, long, default_value = "nnTest.dat", env = "WHISTLR_WEIGHTS")]
    pub weights: PathBuf,

    /// JSON detection configuration (missing fields keep defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for detection images
    #[arg(short, long, default_value = "whistlers")]
    pub output: PathBuf,

    /// Do not render detection images
    #[arg(long)]
    pub no_plots: bool,

    /// Binarization percentile (0-100)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Lower edge of the frequency band, kHz
    #[arg(long)]
    pub band_lo: Option<f64>,

    /// Upper edge of the frequency band, kHz
    #[arg(long)]
    pub band_hi: Option<f64>,

    /// Last candidate time of the scan grid, seconds
    #[arg(long)]
    pub scan_end: Option<f64>,

    /// Image width in pixels
    #[arg(long, default_value = "600")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "300")]
    pub height: u32,

    /// Image colormap (viridis, grayscale)
    #[arg(long, default_value = "viridis")]
    pub colormap: String,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Write a JSON report of the whole batch to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Detection configuration from the config file, then flag overrides
    pub fn detection_config(&self) -> Result<DetectionConfig> {
        let mut config = match &self.config {
            Some(path) => DetectionConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => DetectionConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.extractor.threshold_percentile = threshold;
        }
        if self.band_lo.is_some() || self.band_hi.is_some() {
            let current = config.extractor.freq_band;
            config.extractor.freq_band = FreqBand::new(
                self.band_lo.unwrap_or(current.lo_khz),
                self.band_hi.unwrap_or(current.hi_khz),
            )?;
        }
        if let Some(end) = self.scan_end {
            config.scan.scan_end = end;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn plot_config(&self) -> Result<PlotConfig> {
        let colormap = Colormap::from_name(&self.colormap)
            .with_context(|| format!("Unknown colormap: {}", self.colormap))?;
        Ok(PlotConfig {
            width: self.width,
            height: self.height,
            colormap,
            ..Default::default()
        })
    }
}

/// Expand directories into the capture files they contain. Explicit file
/// arguments are kept whatever their extension.
pub fn collect_capture_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_capture(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

fn is_capture(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(CAPTURE_EXTENSION))
}
