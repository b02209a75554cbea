//! FFT processing with windowing

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use super::windows::{create_window, WindowType};

/// Tapered FFT of fixed-size frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    variance_factor: f64,
    fft_size: usize,
}

impl FftProcessor {
    pub fn new(fft_size: usize, window_type: WindowType) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(fft_size),
            window: create_window(fft_size, window_type),
            variance_factor: window_type.variance_factor(),
            fft_size,
        }
    }

    /// One-sided power spectrum in dB: `10·log10(|X|² / varw)` for the first
    /// `fft_size / 2` bins. Silent frames yield `-inf`.
    pub fn power_spectrum_db(&self, frame: &[f64]) -> Vec<f64> {
        let mut buffer: Vec<Complex<f64>> = frame
            .iter()
            .take(self.fft_size)
            .zip(self.window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();

        // Zero-pad if necessary
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2]
            .iter()
            .map(|c| 10.0 * (c.norm_sqr() / self.variance_factor).log10())
            .collect()
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_power_spectrum_length() {
        let fft = FftProcessor::new(1024, WindowType::Hann);
        let frame: Vec<f64> = (0..1024).map(|i| (2.0 * PI * 64.0 * i as f64 / 1024.0).sin()).collect();
        let spectrum = fft.power_spectrum_db(&frame);
        assert_eq!(spectrum.len(), 512);

        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 64);
    }

    #[test]
    fn test_silent_frame_is_negative_infinity() {
        let fft = FftProcessor::new(256, WindowType::Hann);
        let spectrum = fft.power_spectrum_db(&[0.0; 256]);
        assert!(spectrum.iter().all(|&p| p == f64::NEG_INFINITY));
    }
}
