//! Error types for scanning and inspection

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that stop a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid pathname: {}: {source}", .path.display())]
    RootPathInvalid {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),
}

/// A directory that could not be listed. The walk skips it and carries on.
#[derive(Debug, Error)]
#[error("cannot read directory {}: {source}", .path.display())]
pub struct DirectoryReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// A candidate file that could not be opened or whose metadata could not be parsed.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read metadata from {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DecodeError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            DecodeError::Open { path, .. } | DecodeError::Metadata { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_path() {
        let err = ScanError::NotADirectory {
            path: PathBuf::from("/tmp/photo.jpg"),
        };
        assert_eq!(err.to_string(), "not a directory: /tmp/photo.jpg");

        let err = DirectoryReadError {
            path: PathBuf::from("/photos/locked"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("cannot read directory /photos/locked"));
    }

    #[test]
    fn test_decode_error_path() {
        let err = DecodeError::Open {
            path: PathBuf::from("a.gif"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.path(), std::path::Path::new("a.gif"));
    }
}
