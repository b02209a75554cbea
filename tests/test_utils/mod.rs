// Shared helpers for integration tests: synthetic captures, weight files and
// the compiled binary.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use uuid::Uuid;

/// Input length of the default detection window (35 bins x 107 frames)
pub const DEFAULT_INPUT_LEN: usize = 35 * 107;

pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_whistlr"))
}

pub fn run_whistlr() -> Command {
    Command::new(get_binary_path())
}

/// Fresh, empty scratch directory under the system temp dir
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("whistlr-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Capture bytes: i32 marker, f64 sample rate, f64 offset, i16 samples
pub fn capture_bytes(sample_rate: f64, offset: f64, samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(20 + samples.len() * 2);
    bytes.extend_from_slice(&1i32.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&offset.to_le_bytes());
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    bytes
}

pub fn write_capture(dir: &Path, name: &str, sample_rate: f64, offset: f64, samples: &[i16]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, capture_bytes(sample_rate, offset, samples)).expect("write capture");
    path
}

pub fn silence(seconds: f64, sample_rate: f64) -> Vec<i16> {
    vec![0; (seconds * sample_rate) as usize]
}

pub fn tone(seconds: f64, sample_rate: f64, freq_hz: f64, amplitude: f64) -> Vec<i16> {
    (0..(seconds * sample_rate) as usize)
        .map(|i| {
            let v = amplitude * (2.0 * std::f64::consts::PI * freq_hz * i as f64 / sample_rate).sin();
            (v * 32767.0) as i16
        })
        .collect()
}

/// Single-layer weights whose decision only depends on the bias column:
/// unit `winner` always has the strongest activation.
pub fn bias_weights_text(input_len: usize, winner: usize, classes: usize) -> String {
    let mut text = format!("{} {}\n", classes, input_len + 1);
    for class in 0..classes {
        let bias = if class == winner { "6" } else { "-6" };
        let mut row = vec![bias.to_string()];
        row.extend(std::iter::repeat("0".to_string()).take(input_len));
        text.push_str(&row.join(" "));
        text.push('\n');
    }
    text.push('\n');
    text
}

pub fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write text file");
    path
}
