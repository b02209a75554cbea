// src/config/settings.rs
//
// Detection window and scan grid configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WhistlerError};

/// Frequency band of interest, in kHz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreqBand {
    pub lo_khz: f64,
    pub hi_khz: f64,
}

impl FreqBand {
    pub fn new(lo_khz: f64, hi_khz: f64) -> Result<Self> {
        let band = Self { lo_khz, hi_khz };
        band.validate()?;
        Ok(band)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.lo_khz.is_finite() && self.hi_khz.is_finite()) || self.lo_khz >= self.hi_khz {
            return Err(WhistlerError::InvalidConfig(format!(
                "frequency band lower edge {} kHz must be below upper edge {} kHz",
                self.lo_khz, self.hi_khz
            )));
        }
        Ok(())
    }

    /// Strict containment test in Hz
    pub fn contains_hz(&self, freq_hz: f64) -> bool {
        freq_hz > self.lo_khz * 1000.0 && freq_hz < self.hi_khz * 1000.0
    }
}

impl Default for FreqBand {
    fn default() -> Self {
        Self {
            lo_khz: 3.0,
            hi_khz: 4.5,
        }
    }
}

/// Parameters for cropping a detection window out of a spectrogram
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Percentile of the clipped crop used as binarization threshold
    pub threshold_percentile: f64,
    pub freq_band: FreqBand,
    /// Seconds kept before the center time
    pub start_buffer: f64,
    /// Seconds kept after the center time
    pub end_buffer: f64,
    /// dB range the crop is clipped to
    pub min_db: f64,
    pub max_db: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            threshold_percentile: 85.0,
            freq_band: FreqBand::default(),
            start_buffer: 0.5,
            end_buffer: 0.75,
            min_db: -40.0,
            max_db: 0.0,
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<()> {
        self.freq_band.validate()?;
        if !(0.0..=100.0).contains(&self.threshold_percentile) {
            return Err(WhistlerError::InvalidConfig(format!(
                "threshold percentile {} outside [0, 100]",
                self.threshold_percentile
            )));
        }
        if !(self.start_buffer >= 0.0 && self.end_buffer >= 0.0)
            || self.start_buffer + self.end_buffer <= 0.0
        {
            return Err(WhistlerError::InvalidConfig(
                "start and end buffers must be non-negative with a positive sum".to_string(),
            ));
        }
        if self.min_db >= self.max_db {
            return Err(WhistlerError::InvalidConfig(format!(
                "clip range [{}, {}] dB is empty",
                self.min_db, self.max_db
            )));
        }
        Ok(())
    }
}

/// Candidate time grid for a scan
///
/// The grid is fixed and independent of the capture length: captures shorter
/// than `scan_end` produce rejected candidates, longer ones are not scanned
/// past `scan_end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Grid spacing and first candidate, seconds
    pub step_size: f64,
    /// Last candidate, seconds (inclusive)
    pub scan_end: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step_size: 0.2,
            scan_end: 60.0,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.step_size > 0.0 && self.scan_end >= self.step_size) {
            return Err(WhistlerError::InvalidConfig(format!(
                "scan grid needs 0 < step ({}) <= end ({})",
                self.step_size, self.scan_end
            )));
        }
        Ok(())
    }

    /// Candidate center times: `candidate_count` evenly spaced points from
    /// `step_size` to `scan_end` inclusive.
    pub fn candidate_times(&self) -> Vec<f64> {
        let count = self.candidate_count();
        match count {
            0 => Vec::new(),
            1 => vec![self.step_size],
            _ => {
                let spacing = (self.scan_end - self.step_size) / (count - 1) as f64;
                (0..count)
                    .map(|i| self.step_size + i as f64 * spacing)
                    .collect()
            }
        }
    }

    pub fn candidate_count(&self) -> usize {
        (self.scan_end / self.step_size).round().max(0.0) as usize
    }
}

/// Complete detection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub extractor: ExtractorConfig,
    pub scan: ScanConfig,
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        self.scan.validate()
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
