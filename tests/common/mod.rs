//! Shared helpers for the integration tests.
//!
//! Each helper owns a [`tempfile::TempDir`], so files and output
//! directories disappear when the helper is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

fn scratch_dir(test_name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("distframe_test_{}_", test_name))
        .tempdir()
        .expect("Failed to create scratch directory")
}

/// A file path inside its own scratch directory. The file itself is not
/// created, so a fresh `TempTestFile` also stands for a missing file.
pub struct TempTestFile {
    _dir: TempDir,
    path: PathBuf,
}

impl TempTestFile {
    pub fn new(test_name: &str, extension: &str) -> Self {
        let dir = scratch_dir(test_name);
        let path = dir.path().join(format!("{}.{}", test_name, extension));
        TempTestFile { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An empty scratch directory for write tests
pub struct TempTestDir {
    dir: TempDir,
}

impl TempTestDir {
    pub fn new(test_name: &str) -> std::io::Result<Self> {
        Ok(TempTestDir {
            dir: tempfile::Builder::new()
                .prefix(&format!("distframe_test_dir_{}_", test_name))
                .tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Writes `text` to a fresh CSV file. Lines are trimmed, so indented
/// literals can be used.
pub fn create_test_csv(test_name: &str, text: &str) -> TempTestFile {
    let file = TempTestFile::new(test_name, "csv");
    fs::write(file.path(), normalize_text(text)).expect("Failed to write test CSV");
    file
}

/// Trims every line and the text as a whole
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of every `part-*` file under `dir`, in name order
pub fn read_part_files(dir: &Path) -> Vec<String> {
    let mut parts: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to list output directory")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with("part-"))
        })
        .collect();
    parts.sort();
    parts
        .iter()
        .map(|p| fs::read_to_string(p).expect("Failed to read part file"))
        .collect()
}
