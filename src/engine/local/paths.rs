use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Error, Result};

/// Turns a plain path or a `file://` URL into a filesystem path
pub fn resolve_path(location: &str) -> Result<PathBuf> {
    if !location.contains("://") {
        return Ok(PathBuf::from(location));
    }
    let url = Url::parse(location)?;
    match url.scheme() {
        "file" => url
            .to_file_path()
            .map_err(|_| Error::Engine(format!("Cannot convert '{}' to a local path", location))),
        scheme => Err(Error::Engine(format!(
            "The local engine cannot access '{}' locations: {}",
            scheme, location
        ))),
    }
}

/// Whether a directory entry is engine bookkeeping (`_SUCCESS`, `_temporary`,
/// hidden files) rather than data
fn is_bookkeeping(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Expands each location to the data files it denotes: a file stands for
/// itself, a directory for its non-bookkeeping files in name order
pub fn expand_locations(locations: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for location in locations {
        let path = resolve_path(location)?;
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(&path)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.is_file())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| !is_bookkeeping(n))
                        .unwrap_or(false)
                })
                .collect();
            entries.sort();
            files.extend(entries);
        } else if path.exists() {
            files.push(path);
        } else {
            return Err(Error::Engine(format!("Path does not exist: {}", path.display())));
        }
    }
    Ok(files)
}

/// Name of the `i`-th part file of a write job
pub fn part_file_name(i: usize, job_id: &str, extension: &str) -> String {
    format!("part-{:05}-{}.{}", i, job_id, extension)
}

pub fn is_part_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("part-"))
        .unwrap_or(false)
}
