//! Test harness for nodate integration tests

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

pub use nodate::test_utils::TestTree;
pub use nodate::test_utils::fixtures;

pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

pub fn run_nodate(dir: &Path, args: &[&str]) -> RunOutput {
    let binary = env!("CARGO_BIN_EXE_nodate");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run nodate");

    RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code(),
    }
}

/// Expected output line for a file at `rel` when scanning with root ".".
pub fn dot_path(rel: &str) -> String {
    Path::new(".").join(rel).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let tree = TestTree::new();
        assert!(tree.path().exists());
    }

    #[test]
    fn test_harness_add_file() {
        let tree = TestTree::new();
        let file_path = tree.add_dated_jpeg("nested/photo.jpg");
        assert!(file_path.exists());
    }
}
