//! Detection result types

use serde::Serialize;

use crate::core::analysis::DetectionWindow;
use crate::core::decoder::DateStamp;

/// A detection window the classifier labelled as a whistler
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Whistler sub-class, never 0
    pub label: usize,
    #[serde(flatten)]
    pub window: DetectionWindow,
}

impl Detection {
    pub fn center_time(&self) -> f64 {
        self.window.center_time
    }
}

/// Outcome of scanning one capture
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanOutcome {
    /// Positive windows in increasing time order
    pub detections: Vec<Detection>,
    /// Candidate times visited
    pub candidates: usize,
    /// Candidates whose window fell outside the capture
    pub rejected: usize,
}

impl ScanOutcome {
    pub fn classified(&self) -> usize {
        self.candidates - self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Per-file summary produced by the analyzer
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file_path: String,
    pub date: DateStamp,
    pub sample_rate: f64,
    pub duration_secs: f64,
    /// Spectrogram (rows, columns)
    pub spectrogram_shape: (usize, usize),
    #[serde(flatten)]
    pub outcome: ScanOutcome,
}

impl FileReport {
    pub fn detection_count(&self) -> usize {
        self.outcome.detections.len()
    }

    /// Labels of all detections, in time order
    pub fn labels(&self) -> Vec<usize> {
        self.outcome.detections.iter().map(|d| d.label).collect()
    }
}
