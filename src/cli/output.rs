//! Output formatting for CLI results

use colorful::Colorful;
use serde::Serialize;

use crate::detection::FileReport;

/// A file that could not be processed
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub file_path: String,
    pub error: String,
}

/// Results of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<FailedFile>,
}

impl BatchReport {
    pub fn total_detections(&self) -> usize {
        self.files.iter().map(|f| f.detection_count()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Format one file's result for terminal output
pub fn format_report(report: &FileReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", report.file_path.clone().cyan()));
    output.push_str(&format!(
        "  {:.1} s at {:.0} Hz, {}\n",
        report.duration_secs, report.sample_rate, report.date
    ));

    if report.outcome.detections.is_empty() {
        output.push_str(&format!("  {}\n", "No whistlers found".green()));
    } else {
        output.push_str(&format!(
            "  {}\n",
            format!("{} whistler window(s)", report.detection_count()).yellow()
        ));
        for detection in &report.outcome.detections {
            output.push_str(&format!(
                "    • {:7.2}s  class {}\n",
                detection.center_time(),
                detection.label
            ));
        }
    }

    if verbose {
        output.push_str(&format!(
            "  Spectrogram: {} bins x {} frames\n",
            report.spectrogram_shape.0, report.spectrogram_shape.1
        ));
        output.push_str(&format!(
            "  Candidates: {} classified, {} outside capture\n",
            report.outcome.classified(),
            report.outcome.rejected
        ));
    }

    output
}

pub fn format_failure(failure: &FailedFile) -> String {
    format!(
        "{}\n  {}\n",
        failure.file_path.clone().cyan(),
        format!("✗ {}", failure.error).red()
    )
}

/// Print the batch as JSON on stdout
pub fn print_json(batch: &BatchReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(batch)?);
    Ok(())
}

/// Print the batch in human-readable form
pub fn print_report(batch: &BatchReport, verbose: bool) {
    for report in &batch.files {
        println!("{}", format_report(report, verbose));
    }
    for failure in &batch.failures {
        println!("{}", format_failure(failure));
    }

    let summary = format!(
        "{} file(s) scanned, {} failed, {} detection(s)",
        batch.files.len() + batch.failures.len(),
        batch.failures.len(),
        batch.total_detections()
    );
    if batch.is_success() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoder::DateStamp;
    use crate::detection::ScanOutcome;

    fn report() -> FileReport {
        FileReport {
            file_path: "WB001.dat".to_string(),
            date: DateStamp::Unknown,
            sample_rate: 44100.0,
            duration_secs: 2.0,
            spectrogram_shape: (512, 171),
            outcome: ScanOutcome {
                detections: Vec::new(),
                candidates: 300,
                rejected: 280,
            },
        }
    }

    #[test]
    fn test_format_clean_report() {
        let text = format_report(&report(), true);
        assert!(text.contains("WB001.dat"));
        assert!(text.contains("No whistlers found"));
        assert!(text.contains("20 classified, 280 outside capture"));
    }

    #[test]
    fn test_batch_json() {
        let batch = BatchReport {
            files: vec![report()],
            failures: vec![FailedFile {
                file_path: "bad.dat".to_string(),
                error: "too short".to_string(),
            }],
        };
        let json: serde_json::Value = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["files"][0]["candidates"], 300);
        assert_eq!(json["files"][0]["date"], "Unknown");
        assert_eq!(json["failures"][0]["file_path"], "bad.dat");
        assert!(!batch.is_success());
    }
}
