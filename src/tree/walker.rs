//! Walk - lazy depth-first file iterator over a directory tree

use std::fs::DirEntry;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::DirectoryReadError;

use super::config::WalkerConfig;
use super::utils::{is_dots, should_ignore_path};

/// Walk `root` with the default configuration.
pub fn walk(root: &Path) -> Walk {
    Walk::new(root, WalkerConfig::default())
}

/// One directory listing waiting to be consumed.
struct Frame {
    entries: std::vec::IntoIter<DirEntry>,
    depth: usize,
}

/// Lazy pre-order walk yielding the path of every regular file below a root.
///
/// Pending directories live on an explicit stack, so tree depth is bounded
/// by heap rather than call stack. Entries of each directory are visited in
/// file-name order. Directories that cannot be listed are skipped and
/// recorded in [`Walk::skipped`]; their siblings are still walked.
/// Symlinks to directories are not followed.
pub struct Walk {
    config: WalkerConfig,
    root: Option<PathBuf>,
    stack: Vec<Frame>,
    directories: usize,
    files: usize,
    skipped: Vec<DirectoryReadError>,
}

impl Walk {
    pub fn new(root: &Path, config: WalkerConfig) -> Self {
        Self {
            config,
            root: Some(root.to_path_buf()),
            stack: Vec::new(),
            directories: 0,
            files: 0,
            skipped: Vec::new(),
        }
    }

    /// Directories listed so far, the root included.
    pub fn directories(&self) -> usize {
        self.directories
    }

    /// Files yielded so far.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Directories that could not be listed.
    pub fn skipped(&self) -> &[DirectoryReadError] {
        &self.skipped
    }

    fn push_dir(&mut self, path: &Path, depth: usize) {
        match read_sorted_entries(path) {
            Ok(entries) => {
                trace!(dir = %path.display(), entries = entries.len(), "listing directory");
                self.directories += 1;
                self.stack.push(Frame {
                    entries: entries.into_iter(),
                    depth,
                });
            }
            Err(source) => {
                let err = DirectoryReadError {
                    path: path.to_path_buf(),
                    source,
                };
                warn!("{}", err);
                self.skipped.push(err);
            }
        }
    }

    fn at_max_depth(&self, depth: usize) -> bool {
        self.config.max_depth.is_some_and(|max| depth >= max)
    }
}

impl Iterator for Walk {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        if let Some(root) = self.root.take() {
            self.push_dir(&root, 0);
        }

        loop {
            let frame = self.stack.last_mut()?;
            let depth = frame.depth;
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };

            if is_dots(&entry.file_name()) {
                continue;
            }

            let path = entry.path();
            if should_ignore_path(&path, &self.config.ignore_patterns) {
                trace!(path = %path.display(), "ignored by pattern");
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "cannot stat entry");
                    continue;
                }
            };

            if file_type.is_dir() {
                if !self.at_max_depth(depth) {
                    self.push_dir(&path, depth + 1);
                }
                continue;
            }

            // Symlinks count only when they resolve to a regular file
            if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                self.files += 1;
                return Some(path);
            }
        }
    }
}

/// Read and sort directory entries by file name.
fn read_sorted_entries(path: &Path) -> std::io::Result<Vec<DirEntry>> {
    let mut entries = readable_entries(path, std::fs::read_dir(path)?);
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

/// Keep the entries that could be read, logging the rest.
fn readable_entries<T>(
    dir: &Path,
    entries: impl Iterator<Item = std::io::Result<T>>,
) -> Vec<T> {
    entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "cannot read directory entry");
                None
            }
        })
        .collect()
}
