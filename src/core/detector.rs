// src/core/detector.rs
//
// Whistler search over a fixed grid of candidate times.

use log::{debug, info};

use super::analysis::WindowExtractor;
use super::classifier::{Classifier, NO_WHISTLER};
use super::decoder::{DateStamp, Waveform};
use super::spectrogram::{Spectrogram, SpectrogramBuilder};
use crate::config::DetectionConfig;
use crate::detection::{Detection, ScanOutcome};
use crate::error::Result;

/// Drives window extraction and classification across a capture
pub struct Scanner<'a> {
    classifier: &'a Classifier,
    extractor: WindowExtractor,
    config: DetectionConfig,
    builder: SpectrogramBuilder,
}

impl<'a> Scanner<'a> {
    pub fn new(classifier: &'a Classifier, config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier,
            extractor: WindowExtractor::new(config.extractor.clone())?,
            config,
            builder: SpectrogramBuilder::new(),
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Build the spectrogram once and scan it
    pub fn search(&self, waveform: &Waveform) -> Result<ScanOutcome> {
        let spectrogram = self.builder.build(waveform)?;
        self.search_spectrogram(&spectrogram, waveform.date())
    }

    /// Scan every candidate time of the grid. Candidates whose window falls
    /// outside the capture are counted as rejected; any other failure ends
    /// the scan.
    pub fn search_spectrogram(&self, spectrogram: &Spectrogram, date: DateStamp) -> Result<ScanOutcome> {
        let times = self.config.scan.candidate_times();
        let mut outcome = ScanOutcome {
            candidates: times.len(),
            ..Default::default()
        };

        for center_time in times {
            let window = match self.extractor.extract(spectrogram, center_time, date) {
                Ok(window) => window,
                Err(e) if e.is_out_of_capture() => {
                    debug!("Skipping candidate {:.2}s: {}", center_time, e);
                    outcome.rejected += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let label = self.classifier.predict(&window)?;
            if label != NO_WHISTLER {
                debug!("Whistler class {} at {:.2}s", label, center_time);
                outcome.detections.push(Detection { label, window });
            }
        }

        info!(
            "Scanned {} candidates ({} outside capture): {} detections",
            outcome.candidates,
            outcome.rejected,
            outcome.detections.len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::core::classifier::{Layer, WeightSet};

    /// Single-layer network whose decision depends only on the bias weights
    fn bias_only_classifier(input_len: usize, winner: usize, classes: usize) -> Classifier {
        let rows = (0..classes)
            .map(|c| {
                let mut row = vec![0.0; input_len + 1];
                row[0] = if c == winner { 8.0 } else { -8.0 };
                row
            })
            .collect();
        Classifier::new(WeightSet::new(vec![Layer::new(rows).unwrap()]).unwrap())
    }

    fn tone_waveform(seconds: f64) -> Waveform {
        let fs = 44100.0;
        let samples = (0..(seconds * fs) as usize)
            .map(|i| 0.25 * (2.0 * std::f64::consts::PI * 3800.0 * i as f64 / fs).sin())
            .collect();
        Waveform::from_samples(samples, fs, 0.0).unwrap()
    }

    #[test]
    fn test_negative_classifier_finds_nothing() {
        let classifier = bias_only_classifier(35 * 107, 0, 2);
        let scanner = Scanner::new(&classifier, DetectionConfig::default()).unwrap();
        let outcome = scanner.search(&tone_waveform(3.0)).unwrap();

        assert_eq!(outcome.candidates, 300);
        assert!(outcome.rejected > 0);
        assert!(outcome.classified() > 0);
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_positive_classifier_keeps_every_classified_window() {
        let classifier = bias_only_classifier(35 * 107, 2, 3);
        let scanner = Scanner::new(&classifier, DetectionConfig::default()).unwrap();
        let outcome = scanner.search(&tone_waveform(3.0)).unwrap();

        assert_eq!(outcome.detections.len(), outcome.classified());
        assert!(outcome.detections.iter().all(|d| d.label == 2));
        assert!(outcome
            .detections
            .windows(2)
            .all(|w| w[1].center_time() > w[0].center_time()));
        assert!((outcome.detections[0].center_time() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_custom_grid() {
        let classifier = bias_only_classifier(35 * 107, 1, 2);
        let config = DetectionConfig {
            scan: ScanConfig {
                step_size: 0.5,
                scan_end: 2.0,
            },
            ..Default::default()
        };
        let scanner = Scanner::new(&classifier, config).unwrap();
        let outcome = scanner.search(&tone_waveform(3.0)).unwrap();

        assert_eq!(outcome.candidates, 4);
        assert_eq!(outcome.rejected, 0);
        let times: Vec<f64> = outcome.detections.iter().map(|d| d.center_time()).collect();
        assert_eq!(times, vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_mismatched_network_aborts_scan() {
        let classifier = bias_only_classifier(10, 0, 2);
        let scanner = Scanner::new(&classifier, DetectionConfig::default()).unwrap();
        let err = scanner.search(&tone_waveform(3.0)).unwrap_err();
        assert!(matches!(err, crate::error::WhistlerError::InputShape { .. }));
    }

    #[test]
    fn test_short_capture_fails_before_scanning() {
        let classifier = bias_only_classifier(35 * 107, 0, 2);
        let scanner = Scanner::new(&classifier, DetectionConfig::default()).unwrap();
        let wave = Waveform::from_samples(vec![0.1; 500], 44100.0, 0.0).unwrap();
        assert!(matches!(
            scanner.search(&wave),
            Err(crate::error::WhistlerError::InsufficientSamples { .. })
        ));
    }
}
