//! Configuration module for whistlr

mod settings;

pub use settings::{DetectionConfig, ExtractorConfig, FreqBand, ScanConfig};
