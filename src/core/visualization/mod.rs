//! Visualization tools for detections
//!
//! Renders detection windows as spectrogram images.

mod spectrogram;

pub use spectrogram::{
    detection_file_name,
    render_detection,
    render_window,
    Colormap,
    PlotConfig,
};
