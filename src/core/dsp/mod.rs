//! Digital Signal Processing utilities

pub mod fft;
pub mod stats;
pub mod windows;

pub use fft::FftProcessor;
pub use stats::{binarize, clip_matrix, percentile};
pub use windows::{create_window, WindowType};
