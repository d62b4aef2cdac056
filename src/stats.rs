//! Scan statistics collection and display
//!
//! Counts what the walk saw and how each candidate image turned out,
//! broken down by extension.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::scan::MissingReason;
use crate::tree::Walk;

/// Collected statistics about one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Directories listed, the root included
    pub directories: usize,
    /// Directories that could not be listed
    pub skipped_directories: usize,
    /// Files seen by the walk
    pub files: usize,
    /// Files with a supported image extension
    pub candidates: usize,
    /// Candidates with a usable date tag
    pub dated: usize,
    /// Candidates reported as missing a date
    pub missing: usize,
    /// Subset of `missing` that failed to decode
    pub undecodable: usize,
    /// Statistics by extension
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub by_extension: Vec<ExtensionStats>,
}

/// Statistics for one image extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionStats {
    pub extension: String,
    pub candidates: usize,
    pub missing: usize,
}

/// Statistics collector that accumulates data during a scan.
#[derive(Debug, Default)]
pub struct StatsCollector {
    dated: usize,
    missing: usize,
    undecodable: usize,
    /// Maps extension -> (candidates, missing)
    by_extension: BTreeMap<String, (usize, usize)>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dated(&mut self, extension: &str) {
        self.dated += 1;
        self.by_extension.entry(extension.to_string()).or_default().0 += 1;
    }

    pub fn record_missing(&mut self, extension: &str, reason: MissingReason) {
        self.missing += 1;
        if reason == MissingReason::Undecodable {
            self.undecodable += 1;
        }
        let entry = self.by_extension.entry(extension.to_string()).or_default();
        entry.0 += 1;
        entry.1 += 1;
    }

    /// Finalize with the walk's own counters and return the summary.
    pub fn finalize(self, walk: &Walk) -> ScanSummary {
        let by_extension = self
            .by_extension
            .into_iter()
            .map(|(extension, (candidates, missing))| ExtensionStats {
                extension,
                candidates,
                missing,
            })
            .collect();

        ScanSummary {
            directories: walk.directories(),
            skipped_directories: walk.skipped().len(),
            files: walk.files(),
            candidates: self.dated + self.missing,
            dated: self.dated,
            missing: self.missing,
            undecodable: self.undecodable,
            by_extension,
        }
    }
}

/// Print the summary to stderr, keeping stdout for the report itself.
pub fn print_summary(summary: &ScanSummary, use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(color_choice);

    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    stderr.set_color(&bold)?;
    writeln!(stderr, "Scan Summary")?;
    stderr.reset()?;
    writeln!(stderr, "────────────")?;

    write!(
        stderr,
        "Directories:  {}",
        format_number(summary.directories)
    )?;
    if summary.skipped_directories > 0 {
        let mut warn = ColorSpec::new();
        warn.set_fg(Some(Color::Yellow));
        stderr.set_color(&warn)?;
        write!(stderr, " ({} unreadable)", summary.skipped_directories)?;
        stderr.reset()?;
    }
    writeln!(stderr)?;
    writeln!(stderr, "Files:        {}", format_number(summary.files))?;
    writeln!(stderr, "Images:       {}", format_number(summary.candidates))?;
    writeln!(stderr, "Dated:        {}", format_number(summary.dated))?;

    let mut missing_color = ColorSpec::new();
    missing_color.set_fg(Some(if summary.missing > 0 {
        Color::Red
    } else {
        Color::Green
    }));
    write!(stderr, "Missing date: ")?;
    stderr.set_color(&missing_color)?;
    write!(stderr, "{}", format_number(summary.missing))?;
    stderr.reset()?;
    if summary.undecodable > 0 {
        write!(stderr, " ({} undecodable)", format_number(summary.undecodable))?;
    }
    writeln!(stderr)?;

    if !summary.by_extension.is_empty() {
        writeln!(stderr)?;
        stderr.set_color(&bold)?;
        writeln!(stderr, "By Extension:")?;
        stderr.reset()?;

        let mut ext_color = ColorSpec::new();
        ext_color.set_fg(Some(Color::Cyan));

        for ext in &summary.by_extension {
            write!(stderr, "  ")?;
            stderr.set_color(&ext_color)?;
            write!(stderr, "{:<8}", format!(".{}", ext.extension))?;
            stderr.reset()?;
            writeln!(
                stderr,
                "{:>8} images  {:>8} missing",
                format_number(ext.candidates),
                format_number(ext.missing)
            )?;
        }
    }

    Ok(())
}

/// Format a number with thousand separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;
    use crate::tree::walk;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_stats_collector() {
        let tree = TestTree::new();
        tree.add_file("a.jpg", b"x");
        tree.add_file("sub/b.png", b"x");
        tree.add_file("sub/c.txt", b"x");
        let mut w = walk(tree.path());
        w.by_ref().for_each(drop);

        let mut collector = StatsCollector::new();
        collector.record_dated("jpg");
        collector.record_missing("png", MissingReason::NoDateTag);
        collector.record_missing("png", MissingReason::Undecodable);

        let stats = collector.finalize(&w);
        assert_eq!(stats.directories, 2);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.dated, 1);
        assert_eq!(stats.missing, 2);
        assert_eq!(stats.undecodable, 1);
        assert_eq!(
            stats.by_extension,
            vec![
                ExtensionStats {
                    extension: "jpg".to_string(),
                    candidates: 1,
                    missing: 0,
                },
                ExtensionStats {
                    extension: "png".to_string(),
                    candidates: 2,
                    missing: 2,
                },
            ]
        );
    }
}
