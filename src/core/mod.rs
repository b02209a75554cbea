//! Core decoding, spectral analysis and detection modules

pub mod analysis;
pub mod analyzer;
pub mod classifier;
pub mod decoder;
pub mod detector;
pub mod dsp;
pub mod spectrogram;
pub mod visualization;

pub use analysis::{DetectionWindow, WindowExtractor};
pub use analyzer::{AnalyzerBuilder, WhistlerAnalyzer};
pub use classifier::{Classifier, Layer, WeightSet};
pub use decoder::{load_waveform, parse_capture, DateStamp, Waveform};
pub use detector::Scanner;
pub use spectrogram::{Spectrogram, SpectrogramBuilder, FRAME_LEN};
