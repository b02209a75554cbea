// src/core/decoder.rs
//
// Wideband VLF capture decoding.
//
// Capture layout (little endian): i32 file start marker, f64 sample rate,
// f64 time offset (in samples), then i16 samples to end of file.

use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, WhistlerError};

/// Size of the fixed capture header in bytes
pub const HEADER_LEN: usize = 4 + 8 + 8;

/// Full-scale value of a signed 16-bit sample
const FULL_SCALE: f64 = 32768.0;

/// Recording date of a capture, when known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DateStamp {
    #[default]
    Unknown,
    Known(NaiveDateTime),
}

impl DateStamp {
    /// Extract a `YYYYMMDDhhmmss` timestamp embedded in a file name
    pub fn from_file_name(path: &Path) -> Self {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return DateStamp::Unknown;
        };

        let bytes = stem.as_bytes();
        let mut start = 0;
        while start < bytes.len() {
            if !bytes[start].is_ascii_digit() {
                start += 1;
                continue;
            }
            let end = bytes[start..]
                .iter()
                .position(|b| !b.is_ascii_digit())
                .map_or(bytes.len(), |p| start + p);
            // any 14-digit window of a longer run may hold the stamp
            if end - start >= 14 {
                for from in start..=end - 14 {
                    let digits = &stem[from..from + 14];
                    if let Ok(dt) = NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S") {
                        return DateStamp::Known(dt);
                    }
                }
            }
            start = end;
        }

        DateStamp::Unknown
    }

    pub fn is_known(&self) -> bool {
        matches!(self, DateStamp::Known(_))
    }
}

impl fmt::Display for DateStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateStamp::Unknown => write!(f, "unknown date"),
            DateStamp::Known(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Decoded capture. Immutable once built.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_rate: f64,
    time_base: Vec<f64>,
    start_offset: f64,
    file_start_marker: i32,
    date: DateStamp,
    source: Option<PathBuf>,
}

impl Waveform {
    /// Build a waveform from normalized samples.
    ///
    /// The time base is `(index + offset) / sample_rate`.
    pub fn from_samples(samples: Vec<f64>, sample_rate: f64, offset: f64) -> Result<Self> {
        Self::assemble(samples, sample_rate, offset, 0, None)
    }

    fn assemble(
        samples: Vec<f64>,
        sample_rate: f64,
        offset: f64,
        file_start_marker: i32,
        source: Option<PathBuf>,
    ) -> Result<Self> {
        let path = source.clone().unwrap_or_default();
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(WhistlerError::MalformedCapture {
                path,
                reason: format!("invalid sample rate {}", sample_rate),
            });
        }
        if !offset.is_finite() {
            return Err(WhistlerError::MalformedCapture {
                path,
                reason: format!("invalid time offset {}", offset),
            });
        }
        if samples.is_empty() {
            return Err(WhistlerError::MalformedCapture {
                path,
                reason: "capture contains no samples".to_string(),
            });
        }

        let time_base = (0..samples.len())
            .map(|i| (i as f64 + offset) / sample_rate)
            .collect();
        let date = source
            .as_deref()
            .map(DateStamp::from_file_name)
            .unwrap_or_default();

        Ok(Self {
            samples,
            sample_rate,
            time_base,
            start_offset: offset,
            file_start_marker,
            date,
            source,
        })
    }

    /// Replace the recording date
    pub fn with_date(mut self, date: DateStamp) -> Self {
        self.date = date;
        self
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn time_base(&self) -> &[f64] {
        &self.time_base
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn file_start_marker(&self) -> i32 {
        self.file_start_marker
    }

    pub fn date(&self) -> DateStamp {
        self.date
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }
}

/// Decode a capture file
pub fn load_waveform(path: &Path) -> Result<Waveform> {
    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode_capture(&bytes, Some(path.to_path_buf()))
}

/// Decode a capture held in memory
pub fn parse_capture(bytes: &[u8]) -> Result<Waveform> {
    decode_capture(bytes, None)
}

fn decode_capture(bytes: &[u8], source: Option<PathBuf>) -> Result<Waveform> {
    if bytes.len() < HEADER_LEN {
        return Err(WhistlerError::MalformedCapture {
            path: source.unwrap_or_default(),
            reason: format!(
                "{} bytes is shorter than the {}-byte header",
                bytes.len(),
                HEADER_LEN
            ),
        });
    }

    let (header, body) = bytes.split_at(HEADER_LEN);
    let file_start_marker = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let sample_rate = f64::from_le_bytes(le_array(&header[4..12]));
    let offset = f64::from_le_bytes(le_array(&header[12..20]));

    if body.len() % 2 != 0 {
        warn!(
            "{}: ignoring trailing odd byte after sample data",
            source.as_deref().unwrap_or(Path::new("<memory>")).display()
        );
    }

    let samples: Vec<f64> = body
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f64 / FULL_SCALE)
        .collect();

    Waveform::assemble(samples, sample_rate, offset, file_start_marker, source)
}

fn le_array(slice: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(slice);
    out
}

/// Encode samples in the capture layout. Inverse of [`parse_capture`] for
/// samples that are exact multiples of 1/32768.
pub fn encode_capture(file_start_marker: i32, sample_rate: f64, offset: f64, samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    bytes.extend_from_slice(&file_start_marker.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&offset.to_le_bytes());
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    bytes
}
