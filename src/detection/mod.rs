//! Detection module for whistlr

mod result;

pub use result::{Detection, FileReport, ScanOutcome};
