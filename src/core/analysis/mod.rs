//! Spectrogram analysis
//!
//! Contains the detection window extraction stage: cropping a fixed
//! time/frequency region around a candidate instant, clipping it to a dB
//! range and thresholding it into the binary image the classifier consumes.

mod spectra;

pub use spectra::{DetectionWindow, WindowExtractor};
