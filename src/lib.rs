//! whistlr - Find whistlers in wideband VLF radio captures
//!
//! Whistlers are dispersed radio emissions from lightning that show up as
//! descending tones in a VLF spectrogram. This crate decodes wideband
//! captures, builds a 50%-overlap Hann spectrogram, crops fixed-size windows
//! around a grid of candidate times and labels each window with a small
//! fixed-weight neural network.
//!
//! ## Module Structure
//!
//! - `core` - Capture decoding, spectrogram, window extraction, classifier, scanner
//! - `cli` - Command-line interface
//! - `config` - Detection window and scan grid configuration
//! - `detection` - Detection result types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use whistlr::core::WhistlerAnalyzer;
//!
//! let analyzer = WhistlerAnalyzer::builder()
//!     .weights_file("nnTest.dat")?
//!     .build()?;
//! let report = analyzer.analyze("WB20110317083000.dat")?;
//!
//! for detection in &report.outcome.detections {
//!     println!("{:.2}s class {}", detection.center_time(), detection.label);
//! }
//! ```
//!
//! ## Pipeline
//!
//! | Stage              | Input            | Output            |
//! |--------------------|------------------|-------------------|
//! | `load_waveform`    | capture file     | `Waveform`        |
//! | `SpectrogramBuilder` | `Waveform`     | `Spectrogram`     |
//! | `WindowExtractor`  | `Spectrogram`, t | `DetectionWindow` |
//! | `Classifier`       | `DetectionWindow`| class label       |
//! | `Scanner`          | `Waveform`       | `ScanOutcome`     |

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Configuration
pub mod config;

// Detection result types
pub mod detection;

// Error types
pub mod error;

// Re-export commonly used types at crate root for convenience
pub use config::{DetectionConfig, ExtractorConfig, FreqBand, ScanConfig};
pub use detection::{Detection, FileReport, ScanOutcome};
pub use error::{Result, WhistlerError};
pub use crate::core::{
    AnalyzerBuilder, Classifier, DateStamp, DetectionWindow, Scanner, Spectrogram,
    SpectrogramBuilder, Waveform, WeightSet, WhistlerAnalyzer, WindowExtractor,
};
