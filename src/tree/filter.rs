//! Extension-based image filtering

use std::path::{Path, PathBuf};

/// Image extensions that are inspected for date tags, lowercase, without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff"];

/// A file that passed the extension filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Lowercased extension, without the dot
    pub extension: String,
}

/// Lowercased substring after the last `.` of the file name.
///
/// Returns `None` when the name has no dot or ends with one.
/// Unlike `Path::extension`, a dot-file such as `.jpg` yields `jpg`.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Check whether a path names a supported image, case-insensitively.
pub fn is_supported_image(path: &Path) -> bool {
    candidate(path).is_some()
}

/// Build a candidate from a path if its extension is supported.
pub fn candidate(path: &Path) -> Option<CandidateFile> {
    let extension = extension_of(path)?;
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return None;
    }
    Some(CandidateFile {
        path: path.to_path_buf(),
        extension,
    })
}
