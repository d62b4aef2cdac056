//! JSON output formatting

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scan::MissingDate;
use crate::stats::ScanSummary;

use super::ReportSink;

/// The document written by [`JsonSink`].
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub root: &'a Path,
    pub missing: &'a [MissingDate],
    pub summary: &'a ScanSummary,
}

/// Buffers entries and writes a single pretty-printed JSON document on finish.
pub struct JsonSink<W: Write> {
    out: W,
    root: PathBuf,
    missing: Vec<MissingDate>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W, root: &Path) -> Self {
        Self {
            out,
            root: root.to_path_buf(),
            missing: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn report(&mut self, missing: &MissingDate) -> io::Result<()> {
        self.missing.push(missing.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        let report = JsonReport {
            root: &self.root,
            missing: &self.missing,
            summary,
        };
        serde_json::to_writer_pretty(&mut self.out, &report).map_err(io::Error::other)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::MissingReason;

    #[test]
    fn test_json_document() {
        let mut sink = JsonSink::new(Vec::new(), Path::new("photos"));
        sink.report(&MissingDate {
            path: PathBuf::from("photos/b.png"),
            reason: MissingReason::NoDateTag,
        })
        .unwrap();
        sink.report(&MissingDate {
            path: PathBuf::from("photos/c.gif"),
            reason: MissingReason::Undecodable,
        })
        .unwrap();
        let summary = ScanSummary {
            candidates: 3,
            dated: 1,
            missing: 2,
            undecodable: 1,
            ..Default::default()
        };
        sink.finish(&summary).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(value["root"], "photos");
        assert_eq!(value["missing"][0]["path"], "photos/b.png");
        assert_eq!(value["missing"][0]["reason"], "no_date_tag");
        assert_eq!(value["missing"][1]["reason"], "undecodable");
        assert_eq!(value["summary"]["missing"], 2);
        assert_eq!(value["summary"]["dated"], 1);
    }
}
