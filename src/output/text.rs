//! Plain output: one path per line

use std::io::{self, Write};

use crate::scan::MissingDate;
use crate::stats::ScanSummary;

use super::ReportSink;

/// Writes each reported path on its own line, nothing else.
pub struct LineSink<W: Write> {
    out: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for LineSink<W> {
    #[cfg(unix)]
    fn report(&mut self, missing: &MissingDate) -> io::Result<()> {
        // Raw bytes so non-UTF-8 names still identify the file
        self.out.write_all(missing.path.as_os_str().as_encoded_bytes())?;
        self.out.write_all(b"\n")
    }

    #[cfg(not(unix))]
    fn report(&mut self, missing: &MissingDate) -> io::Result<()> {
        writeln!(self.out, "{}", missing.path.display())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> io::Result<()> {
        self.out.flush()
    }
}
