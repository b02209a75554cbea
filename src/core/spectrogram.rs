// src/core/spectrogram.rs
//
// Short-time Fourier power spectrogram with 50%-overlapping Hann frames.

use log::debug;

use super::decoder::Waveform;
use super::dsp::{FftProcessor, WindowType};
use crate::error::{Result, WhistlerError};

/// Analysis frame length in samples
pub const FRAME_LEN: usize = 1024;

/// Time-frequency power matrix
///
/// `power[row][col]` is the dB power of frequency `freq_base[row]` at time
/// `time_base[col]`.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    time_base: Vec<f64>,
    freq_base: Vec<f64>,
    power: Vec<Vec<f64>>,
}

impl Spectrogram {
    /// Assemble a spectrogram, checking that `power` is
    /// `freq_base.len()` rows by `time_base.len()` columns.
    pub fn from_parts(time_base: Vec<f64>, freq_base: Vec<f64>, power: Vec<Vec<f64>>) -> Result<Self> {
        if power.len() != freq_base.len() || power.iter().any(|row| row.len() != time_base.len()) {
            return Err(WhistlerError::InvalidConfig(format!(
                "power matrix does not match {} frequencies x {} times",
                freq_base.len(),
                time_base.len()
            )));
        }
        Ok(Self {
            time_base,
            freq_base,
            power,
        })
    }

    pub fn time_base(&self) -> &[f64] {
        &self.time_base
    }

    pub fn freq_base(&self) -> &[f64] {
        &self.freq_base
    }

    pub fn power(&self) -> &[Vec<f64>] {
        &self.power
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.freq_base.len(), self.time_base.len())
    }

    /// Nominal column spacing, measured between columns 9 and 10 where
    /// available. Shorter spectrograms fall back to the first column time,
    /// which equals the frame hop for a uniform time base.
    pub fn time_step(&self) -> f64 {
        if self.time_base.len() > 10 {
            self.time_base[10] - self.time_base[9]
        } else {
            self.time_base.first().copied().unwrap_or(0.0)
        }
    }
}

/// Builds the power spectrogram of a waveform
pub struct SpectrogramBuilder {
    frame_len: usize,
    fft: FftProcessor,
}

impl SpectrogramBuilder {
    pub fn new() -> Self {
        Self::with_frame_len(FRAME_LEN)
    }

    /// Frame length must be even
    pub fn with_frame_len(frame_len: usize) -> Self {
        Self {
            frame_len,
            fft: FftProcessor::new(frame_len, WindowType::Hann),
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn build(&self, waveform: &Waveform) -> Result<Spectrogram> {
        let samples = waveform.samples();
        let fs = waveform.sample_rate();
        let nw = self.frame_len;
        let half = nw / 2;

        let n_full = samples.len() / nw;
        if n_full == 0 {
            return Err(WhistlerError::InsufficientSamples {
                samples: samples.len(),
                frame: nw,
            });
        }
        let n_half = n_full - 1;
        let n_win = n_full + n_half;

        // Even columns take the back-to-back frames, odd columns the frames
        // shifted by half a frame.
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_win);
        for col in 0..n_win {
            let k = col / 2;
            let start = if col % 2 == 0 { k * nw } else { half + k * nw };
            columns.push(self.fft.power_spectrum_db(&samples[start..start + nw]));
        }

        let mut power = vec![vec![0.0; n_win]; half];
        for (col, spectrum) in columns.iter().enumerate() {
            for (row, &db) in spectrum.iter().enumerate() {
                power[row][col] = db;
            }
        }

        let freq_base = (0..half).map(|m| fs * m as f64 / nw as f64).collect();
        let time_base = (1..=n_win).map(|k| k as f64 * 0.5 * nw as f64 / fs).collect();

        debug!(
            "Spectrogram: {} samples -> {} bins x {} frames ({} full, {} half-shifted)",
            samples.len(),
            half,
            n_win,
            n_full,
            n_half
        );

        Spectrogram::from_parts(time_base, freq_base, power)
    }
}

impl Default for SpectrogramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn waveform(samples: Vec<f64>, fs: f64) -> Waveform {
        Waveform::from_samples(samples, fs, 0.0).unwrap()
    }

    #[test]
    fn test_shape_and_bases() {
        let fs = 44100.0;
        let samples: Vec<f64> = (0..4096 + 300)
            .map(|i| 0.3 * (2.0 * PI * 3500.0 * i as f64 / fs).sin())
            .collect();
        let spec = SpectrogramBuilder::new().build(&waveform(samples, fs)).unwrap();

        // 4 full frames, 3 half-shifted frames
        assert_eq!(spec.shape(), (512, 7));
        assert_eq!(spec.power().len(), 512);
        assert!(spec.power().iter().all(|row| row.len() == 7));

        assert_eq!(spec.freq_base()[0], 0.0);
        assert!((spec.freq_base()[1] - fs / 1024.0).abs() < 1e-9);
        assert!((spec.time_base()[0] - 512.0 / fs).abs() < 1e-12);
        assert!((spec.time_base()[6] - 7.0 * 512.0 / fs).abs() < 1e-12);
        assert!(spec.power().iter().flatten().all(|p| p.is_finite()));
    }

    #[test]
    fn test_single_frame() {
        let spec = SpectrogramBuilder::new()
            .build(&waveform(vec![0.1; 1500], 8000.0))
            .unwrap();
        assert_eq!(spec.shape(), (512, 1));
        assert!((spec.time_step() - 512.0 / 8000.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_short_capture() {
        let err = SpectrogramBuilder::new()
            .build(&waveform(vec![0.1; 1023], 8000.0))
            .unwrap_err();
        assert!(matches!(
            err,
            WhistlerError::InsufficientSamples { samples: 1023, frame: 1024 }
        ));
    }

    #[test]
    fn test_silence_is_negative_infinity() {
        let spec = SpectrogramBuilder::new()
            .build(&waveform(vec![0.0; 3000], 44100.0))
            .unwrap();
        assert_eq!(spec.shape(), (512, 3));
        assert!(spec.power().iter().flatten().all(|&p| p == f64::NEG_INFINITY));
    }

    #[test]
    fn test_half_shifted_frames_land_in_odd_columns() {
        // An impulse at sample 2048 sits at the taper peak of column 3
        // (starting at 1536) and at the zero of column 4 (starting at 2048).
        let mut samples = vec![0.0; 4096];
        samples[2048] = 0.5;
        let spec = SpectrogramBuilder::new().build(&waveform(samples, 44100.0)).unwrap();

        let expected = 10.0 * (0.25f64 / 0.375).log10();
        for row in spec.power() {
            for (col, &p) in row.iter().enumerate() {
                if col == 3 {
                    assert!((p - expected).abs() < 1e-9, "column 3: {}", p);
                } else {
                    assert_eq!(p, f64::NEG_INFINITY, "column {}", col);
                }
            }
        }
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        let fs = 1024.0 * 4.0;
        let tone_bin = 100;
        let samples: Vec<f64> = (0..8192)
            .map(|i| (2.0 * PI * tone_bin as f64 * i as f64 / 1024.0).sin())
            .collect();
        let spec = SpectrogramBuilder::new().build(&waveform(samples, fs)).unwrap();

        for col in 0..spec.shape().1 {
            let peak = (0..512)
                .max_by(|&a, &b| spec.power()[a][col].total_cmp(&spec.power()[b][col]))
                .unwrap();
            assert_eq!(peak, tone_bin);
        }
        assert!((spec.freq_base()[tone_bin] - 400.0).abs() < 1e-9);
    }
}
