// src/core/analysis/spectra.rs
//
// Fixed-size detection windows cropped out of a spectrogram.

use log::debug;
use serde::Serialize;

use crate::config::{ExtractorConfig, FreqBand};
use crate::core::decoder::DateStamp;
use crate::core::dsp::{binarize, clip_matrix, percentile};
use crate::core::spectrogram::Spectrogram;
use crate::error::{Result, SelectionAxis, WhistlerError};

/// Cropped, clipped and thresholded view of a spectrogram around one instant
#[derive(Debug, Clone, Serialize)]
pub struct DetectionWindow {
    pub center_time: f64,
    pub date: DateStamp,
    pub threshold_percentile: f64,
    pub freq_band: FreqBand,
    pub start_buffer: f64,
    pub end_buffer: f64,
    /// dB power clipped to the configured range, rows are frequencies
    #[serde(skip)]
    pub cropped_power: Vec<Vec<f64>>,
    /// 1.0 above the percentile threshold, 0.0 elsewhere
    #[serde(skip)]
    pub binary_image: Vec<Vec<f64>>,
    #[serde(skip)]
    pub cropped_time_base: Vec<f64>,
    #[serde(skip)]
    pub cropped_freq_base: Vec<f64>,
}

impl DetectionWindow {
    /// (rows, columns) of the cropped image
    pub fn shape(&self) -> (usize, usize) {
        let rows = self.binary_image.len();
        let cols = self.binary_image.first().map_or(0, |r| r.len());
        (rows, cols)
    }

    /// Binary image flattened column by column: all rows of the first time
    /// column, then the second, and so on.
    pub fn flatten_column_major(&self) -> Vec<f64> {
        let (rows, cols) = self.shape();
        let mut flat = Vec::with_capacity(rows * cols);
        for col in 0..cols {
            for row in &self.binary_image {
                flat.push(row[col]);
            }
        }
        flat
    }

    pub fn start_time(&self) -> Option<f64> {
        self.cropped_time_base.first().copied()
    }

    pub fn end_time(&self) -> Option<f64> {
        self.cropped_time_base.last().copied()
    }
}

/// Crops detection windows out of a spectrogram
#[derive(Debug, Clone, Default)]
pub struct WindowExtractor {
    config: ExtractorConfig,
}

impl WindowExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Number of columns every window carries for this spectrogram's spacing
    pub fn expected_columns(&self, spectrogram: &Spectrogram) -> usize {
        let span = self.config.start_buffer + self.config.end_buffer;
        (span / spectrogram.time_step()).floor() as usize
    }

    pub fn extract(&self, spectrogram: &Spectrogram, center_time: f64, date: DateStamp) -> Result<DetectionWindow> {
        let cfg = &self.config;
        let times = spectrogram.time_base();
        let n_cols = times.len();
        let t_last = times.last().copied().unwrap_or(0.0);

        // Zero padding the width of the original on both sides, with the
        // time axis continued by one capture length in each direction.
        let padded_time: Vec<f64> = times
            .iter()
            .map(|t| t - t_last)
            .chain(times.iter().copied())
            .chain(times.iter().map(|t| t + t_last))
            .collect();

        let expected = self.expected_columns(spectrogram);

        let row_mask: Vec<bool> = spectrogram
            .freq_base()
            .iter()
            .map(|&f| cfg.freq_band.contains_hz(f))
            .collect();
        if !row_mask.iter().any(|&m| m) {
            return Err(WhistlerError::EmptySelection {
                center_time,
                axis: SelectionAxis::Frequency,
            });
        }

        let lower = center_time - cfg.start_buffer;
        let upper = center_time + cfg.end_buffer;
        let mut col_mask: Vec<bool> = padded_time.iter().map(|&t| t > lower && t < upper).collect();
        col_mask = reconcile_mask(col_mask, expected);

        let selected_cols: Vec<usize> = (0..col_mask.len()).filter(|&i| col_mask[i]).collect();
        if selected_cols.is_empty() {
            return Err(WhistlerError::EmptySelection {
                center_time,
                axis: SelectionAxis::Time,
            });
        }
        if selected_cols.len() != expected {
            return Err(WhistlerError::TruncatedWindow {
                center_time,
                expected,
                got: selected_cols.len(),
            });
        }

        let mut cropped_power = Vec::new();
        let mut cropped_freq_base = Vec::new();
        for (row, freq) in spectrogram.freq_base().iter().enumerate() {
            if !row_mask[row] {
                continue;
            }
            let source = &spectrogram.power()[row];
            cropped_power.push(
                selected_cols
                    .iter()
                    .map(|&c| padded_value(source, n_cols, c))
                    .collect::<Vec<f64>>(),
            );
            cropped_freq_base.push(*freq);
        }
        let cropped_time_base = selected_cols.iter().map(|&c| padded_time[c]).collect();

        clip_matrix(&mut cropped_power, cfg.min_db, cfg.max_db);

        let values: Vec<f64> = cropped_power.iter().flatten().copied().collect();
        let threshold = percentile(&values, cfg.threshold_percentile).unwrap_or(cfg.max_db);
        let binary_image = binarize(&cropped_power, threshold);

        debug!(
            "Window at {:.2}s: {}x{} crop, threshold {:.2} dB",
            center_time,
            cropped_power.len(),
            expected,
            threshold
        );

        Ok(DetectionWindow {
            center_time,
            date,
            threshold_percentile: cfg.threshold_percentile,
            freq_band: cfg.freq_band,
            start_buffer: cfg.start_buffer,
            end_buffer: cfg.end_buffer,
            cropped_power,
            binary_image,
            cropped_time_base,
            cropped_freq_base,
        })
    }
}

/// Value of column `c` in `[zeros | row | zeros]`
fn padded_value(row: &[f64], n_cols: usize, c: usize) -> f64 {
    if c >= n_cols && c < 2 * n_cols {
        row[c - n_cols]
    } else {
        0.0
    }
}

/// Nudge the selected column count toward `expected` by one column.
///
/// Too many: keep columns whose right neighbour is also selected, dropping
/// the trailing edge. Too few: also select the column right after each
/// selected one. Neighbours wrap around the axis.
fn reconcile_mask(mask: Vec<bool>, expected: usize) -> Vec<bool> {
    let count = mask.iter().filter(|&&m| m).count();
    let n = mask.len();
    if n == 0 || count == expected {
        return mask;
    }

    if count > expected {
        (0..n).map(|i| mask[i] && mask[(i + 1) % n]).collect()
    } else {
        (0..n).map(|i| mask[i] || mask[(i + n - 1) % n]).collect()
    }
}
