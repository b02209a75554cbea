// src/core/analyzer.rs
//
// High-level whistler search API with builder pattern.

use log::info;
use std::path::Path;

use super::classifier::{Classifier, WeightSet};
use super::decoder::{load_waveform, Waveform};
use super::detector::Scanner;
use super::spectrogram::SpectrogramBuilder;
use crate::config::{DetectionConfig, FreqBand};
use crate::detection::FileReport;
use crate::error::{Result, WhistlerError};

/// Builder for WhistlerAnalyzer configuration
pub struct AnalyzerBuilder {
    config: DetectionConfig,
    weights: Option<WeightSet>,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
            weights: None,
        }
    }

    pub fn config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn threshold_percentile(mut self, percentile: f64) -> Self {
        self.config.extractor.threshold_percentile = percentile;
        self
    }

    pub fn freq_band(mut self, band: FreqBand) -> Self {
        self.config.extractor.freq_band = band;
        self
    }

    pub fn scan_end(mut self, seconds: f64) -> Self {
        self.config.scan.scan_end = seconds;
        self
    }

    pub fn weights(mut self, weights: WeightSet) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn weights_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let weights = WeightSet::load(path.as_ref())?;
        Ok(self.weights(weights))
    }

    pub fn build(self) -> Result<WhistlerAnalyzer> {
        self.config.validate()?;
        let weights = self
            .weights
            .ok_or_else(|| WhistlerError::InvalidConfig("no classifier weights supplied".to_string()))?;
        Ok(WhistlerAnalyzer {
            classifier: Classifier::new(weights),
            config: self.config,
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads captures and searches them for whistlers
pub struct WhistlerAnalyzer {
    classifier: Classifier,
    config: DetectionConfig,
}

impl WhistlerAnalyzer {
    /// Create a builder for custom configuration
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Load and scan one capture file
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> Result<FileReport> {
        let path = path.as_ref();
        let waveform = load_waveform(path)?;
        info!(
            "{}: {} samples at {} Hz ({})",
            path.display(),
            waveform.len(),
            waveform.sample_rate(),
            waveform.date()
        );
        self.analyze_waveform(&waveform, &path.display().to_string())
    }

    /// Scan an already decoded waveform
    pub fn analyze_waveform(&self, waveform: &Waveform, name: &str) -> Result<FileReport> {
        let spectrogram = SpectrogramBuilder::new().build(waveform)?;
        let scanner = Scanner::new(&self.classifier, self.config.clone())?;
        let outcome = scanner.search_spectrogram(&spectrogram, waveform.date())?;

        Ok(FileReport {
            file_path: name.to_string(),
            date: waveform.date(),
            sample_rate: waveform.sample_rate(),
            duration_secs: waveform.duration_secs(),
            spectrogram_shape: spectrogram.shape(),
            outcome,
        })
    }
}
