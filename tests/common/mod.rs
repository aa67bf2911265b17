//! Shared test helpers.

use std::path::{Path, PathBuf};

/// Create a temp dir and write files. Returns (guard, root). Paths are
/// relative to root; parent dirs are created.
pub fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
    }
    (dir, root)
}

/// Create asset-set (or catalog) directories, relative to root.
pub fn asset_dirs(root: &Path, dirs: &[&str]) {
    for dir in dirs {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }
}

/// Scan `root` with defaults and the given worker count.
#[allow(dead_code)]
pub fn scan_with_workers(root: &Path, workers: usize) -> assetsweep::ScanResult {
    assetsweep::scan(&assetsweep::Options {
        root: root.to_path_buf(),
        include: Vec::new(),
        exclude: Vec::new(),
        workers,
    })
    .unwrap()
}
