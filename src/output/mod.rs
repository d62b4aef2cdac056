//! Reporting sinks for files that are missing a date taken
//!
//! Sinks receive entries in traversal order and must not reorder or
//! deduplicate them.

mod json;
mod text;

use std::io;

use crate::scan::MissingDate;
use crate::stats::ScanSummary;

pub use json::{JsonReport, JsonSink};
pub use text::LineSink;

/// Callback receiving scan results as they are produced.
pub trait ReportSink {
    /// Record one file lacking a usable date tag.
    fn report(&mut self, missing: &MissingDate) -> io::Result<()>;

    /// Called once after the walk completes.
    fn finish(&mut self, _summary: &ScanSummary) -> io::Result<()> {
        Ok(())
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn report(&mut self, missing: &MissingDate) -> io::Result<()> {
        (**self).report(missing)
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        (**self).finish(summary)
    }
}
