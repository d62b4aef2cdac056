//! Scanner - ties the walk, the extension filter and the date inspector together

use std::io;
use std::path::{Path, PathBuf};

use rayon::ThreadPool;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::error::ScanError;
use crate::inspect::{DateTagInspector, Inspection, MetadataBackend};
use crate::output::ReportSink;
use crate::stats::{ScanSummary, StatsCollector};
use crate::tree::{CandidateFile, ScanConfig, Walk, candidate};

/// Why a file was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    /// Metadata was read but neither date tag was present as ASCII text
    NoDateTag,
    /// The file could not be opened or its metadata could not be parsed
    Undecodable,
}

/// A candidate image without a usable date taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDate {
    pub path: PathBuf,
    pub reason: MissingReason,
}

/// Paths missing a date, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub missing: Vec<PathBuf>,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

impl ReportSink for ScanResult {
    fn report(&mut self, missing: &MissingDate) -> io::Result<()> {
        self.missing.push(missing.path.clone());
        Ok(())
    }
}

/// Check that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<(), ScanError> {
    let meta = std::fs::metadata(root).map_err(|source| ScanError::RootPathInvalid {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Scan `root` sequentially with the EXIF backend and collect every
/// image missing a date.
pub fn find_missing_dates(root: &Path) -> Result<ScanResult, ScanError> {
    validate_root(root)?;
    let inspector = DateTagInspector::with_exif();
    let scanner = Scanner::new(ScanConfig::default(), &inspector);
    let mut result = ScanResult::default();
    scanner.scan(root, &mut result)?;
    Ok(result)
}

/// Walks a tree and reports every candidate image lacking a date taken.
///
/// The inspector, and whatever state its backend holds, is owned by the
/// caller and only borrowed for the duration of the scan.
pub struct Scanner<'a, B: MetadataBackend> {
    config: ScanConfig,
    inspector: &'a DateTagInspector<B>,
}

impl<'a, B: MetadataBackend> Scanner<'a, B> {
    pub fn new(config: ScanConfig, inspector: &'a DateTagInspector<B>) -> Self {
        Self { config, inspector }
    }

    /// Scan `root`, pushing missing-date files into `sink` in traversal order.
    ///
    /// `root` is not re-validated here; see [`validate_root`]. Unreadable
    /// directories and undecodable files never fail the scan. Only a
    /// failing sink does.
    pub fn scan<S: ReportSink>(&self, root: &Path, sink: &mut S) -> Result<ScanSummary, ScanError> {
        info!(root = %root.display(), backend = self.inspector.backend().name(), "scan started");

        let mut walk = Walk::new(root, self.config.walker.clone());
        let mut stats = StatsCollector::new();

        if self.config.is_sequential() {
            self.scan_sequential(&mut walk, &mut stats, sink)?;
        } else {
            self.scan_parallel(&mut walk, &mut stats, sink)?;
        }

        let summary = stats.finalize(&walk);
        info!(
            files = summary.files,
            candidates = summary.candidates,
            missing = summary.missing,
            "scan finished"
        );
        sink.finish(&summary)?;
        Ok(summary)
    }

    fn scan_sequential<S: ReportSink>(
        &self,
        walk: &mut Walk,
        stats: &mut StatsCollector,
        sink: &mut S,
    ) -> Result<(), ScanError> {
        for path in walk.by_ref() {
            let Some(file) = candidate(&path) else {
                continue;
            };
            let inspection = self.inspector.inspect(&file.path);
            self.record(file, inspection, stats, sink)?;
        }
        Ok(())
    }

    /// Inspect candidates in batches on a rayon pool, flushing each batch in
    /// walk order so the output matches the sequential scan.
    fn scan_parallel<S: ReportSink>(
        &self,
        walk: &mut Walk,
        stats: &mut StatsCollector,
        sink: &mut S,
    ) -> Result<(), ScanError> {
        let pool = self.build_pool();
        let batch_size = self.config.batch_size.max(1);

        loop {
            let batch: Vec<CandidateFile> = walk
                .by_ref()
                .filter_map(|path| candidate(&path))
                .take(batch_size)
                .collect();
            if batch.is_empty() {
                break;
            }

            debug!(size = batch.len(), "inspecting batch");
            let inspections = self.inspect_batch(pool.as_ref(), &batch);
            for (file, inspection) in batch.into_iter().zip(inspections) {
                self.record(file, inspection, stats, sink)?;
            }
        }
        Ok(())
    }

    /// `None` means rayon's global pool.
    fn build_pool(&self) -> Option<ThreadPool> {
        if self.config.parallel_workers == 0 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallel_workers)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                // Fall back to rayon's global pool if custom pool creation fails
                warn!("cannot build worker pool, using default: {}", e);
                None
            }
        }
    }

    fn inspect_batch(&self, pool: Option<&ThreadPool>, batch: &[CandidateFile]) -> Vec<Inspection> {
        let run = || -> Vec<Inspection> {
            batch
                .par_iter()
                .map(|file| self.inspector.inspect(&file.path))
                .collect()
        };
        match pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn record<S: ReportSink>(
        &self,
        file: CandidateFile,
        inspection: Inspection,
        stats: &mut StatsCollector,
        sink: &mut S,
    ) -> Result<(), ScanError> {
        let reason = match inspection {
            Inspection::Dated(tag) => {
                trace!(path = %file.path.display(), tag = tag.name(), "dated");
                stats.record_dated(&file.extension);
                return Ok(());
            }
            Inspection::Undated => MissingReason::NoDateTag,
            Inspection::Undecodable(_) => MissingReason::Undecodable,
        };

        stats.record_missing(&file.extension, reason);
        sink.report(&MissingDate {
            path: file.path,
            reason,
        })?;
        Ok(())
    }
}
