//! Window function implementations

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// Periodic Hann, `0.5 * (1 - cos(2πj/N))`
    Hann,
}

impl WindowType {
    /// Mean-square of the window over a full period, used to normalize
    /// power spectra.
    pub fn variance_factor(&self) -> f64 {
        match self {
            WindowType::Hann => 3.0 / 8.0,
        }
    }
}

/// Create window function
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f64> {
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = i as f64;
            match window_type {
                WindowType::Hann => 0.5 * (1.0 - (2.0 * PI * x / n).cos()),
                }
        })
        .collect()
}
