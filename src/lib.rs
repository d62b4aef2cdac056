//! nodate - find photos that are missing an embedded date taken

pub mod error;
pub mod inspect;
pub mod output;
pub mod scan;
pub mod stats;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{DecodeError, DirectoryReadError, ScanError};
pub use inspect::{DateTag, DateTagInspector, ExifBackend, Inspection, MetadataBackend, MetadataView};
pub use output::{JsonSink, LineSink, ReportSink};
pub use scan::{MissingDate, MissingReason, ScanResult, Scanner, find_missing_dates, validate_root};
pub use stats::{ScanSummary, print_summary};
pub use tree::{ScanConfig, Walk, WalkerConfig, is_supported_image, walk};
