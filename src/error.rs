//! Crate-level error type

use std::fmt;
use std::path::PathBuf;

/// Axis of a spectrogram mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAxis {
    Time,
    Frequency,
}

impl fmt::Display for SelectionAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionAxis::Time => write!(f, "time"),
            SelectionAxis::Frequency => write!(f, "frequency"),
        }
    }
}

/// Errors raised by the detection pipeline
#[derive(thiserror::Error, Debug)]
pub enum WhistlerError {
    #[error("Malformed capture {}: {reason}", path.display())]
    MalformedCapture { path: PathBuf, reason: String },

    #[error("Insufficient samples: {samples} available, one analysis frame needs {frame}")]
    InsufficientSamples { samples: usize, frame: usize },

    #[error("Empty {axis} selection for window centered at {center_time:.3}s")]
    EmptySelection { center_time: f64, axis: SelectionAxis },

    #[error("Window centered at {center_time:.3}s runs off the time axis: expected {expected} columns, got {got}")]
    TruncatedWindow { center_time: f64, expected: usize, got: usize },

    #[error("Weight file format error: {0}")]
    WeightFileFormat(String),

    #[error("Classifier input has {got} values, first layer expects {expected}")]
    InputShape { expected: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WhistlerError {
    /// True for extractor rejections caused by a candidate time lying
    /// outside the usable part of the capture. An empty frequency selection
    /// is a configuration problem and does not count.
    pub fn is_out_of_capture(&self) -> bool {
        matches!(
            self,
            WhistlerError::EmptySelection { axis: SelectionAxis::Time, .. }
                | WhistlerError::TruncatedWindow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WhistlerError>;
