use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively collect every file under `root` whose extension is `extension`.
///
/// Paths come back absolute, in directory-traversal order (not sorted).
/// Symlinked directories are not descended into.
/// A missing root, a root that is a plain file, or a tree without matches all
/// yield an empty list rather than an error.
pub fn find_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "data directory not found, nothing to load");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }
        let path = entry.path();
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        files.push(absolute);
    }
    files
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == extension)
        .unwrap_or(false)
}
