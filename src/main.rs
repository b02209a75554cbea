// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process;

use whistlr::cli::{collect_capture_files, print_json, print_report, Args, BatchReport, FailedFile};
use whistlr::core::visualization::{detection_file_name, render_detection, PlotConfig};
use whistlr::core::{WeightSet, WhistlerAnalyzer};
use whistlr::detection::FileReport;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every file was processed
fn run(args: &Args) -> Result<bool> {
    let config = args.detection_config()?;
    let plot_config = args.plot_config()?;

    let weights = WeightSet::load(&args.weights)
        .with_context(|| format!("Failed to load classifier weights: {}", args.weights.display()))?;
    let analyzer = WhistlerAnalyzer::builder()
        .config(config)
        .weights(weights)
        .build()?;

    let files = collect_capture_files(&args.paths);
    if files.is_empty() {
        warn!("No capture files found");
        return Ok(true);
    }
    info!("Found {} capture file(s)", files.len());

    if !args.no_plots {
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("Failed to create output directory: {}", args.output.display()))?;
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<(PathBuf, Result<FileReport>)> = files
        .par_iter()
        .progress_with(progress.clone())
        .map(|path| (path.clone(), process_file(path, &analyzer, args, &plot_config)))
        .collect();
    progress.finish_and_clear();

    let mut batch = BatchReport::default();
    for (path, result) in results {
        match result {
            Ok(report) => batch.files.push(report),
            Err(e) => {
                error!("{}: {:#}", path.display(), e);
                batch.failures.push(FailedFile {
                    file_path: path.display().to_string(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    if args.json {
        print_json(&batch)?;
    } else {
        print_report(&batch, args.verbose);
    }

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&batch)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
    }

    Ok(batch.is_success())
}

fn process_file(path: &Path, analyzer: &WhistlerAnalyzer, args: &Args, plot_config: &PlotConfig) -> Result<FileReport> {
    let report = analyzer
        .analyze(path)
        .with_context(|| format!("Failed to scan {}", path.display()))?;

    if !args.no_plots {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("capture");
        for detection in &report.outcome.detections {
            let output_path = args.output.join(detection_file_name(stem, detection));
            render_detection(&detection.window, plot_config, &output_path)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
        }
    }

    Ok(report)
}
