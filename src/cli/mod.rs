// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{collect_capture_files, Args};
pub use output::{format_failure, format_report, print_json, print_report, BatchReport, FailedFile};
