use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{Error, Result};

/// Extensions considered reviewable when scanning a directory.
const REVIEW_EXTS: &[&str] = &[
    "py", "js", "ts", "java", "go", "rs", "cpp", "c", "cs", "md", "txt", "yml", "yaml", "toml",
    "json",
];

/// Enumerate reviewable files under `target`, sorted for determinism.
///
/// A file target is returned as-is, with no extension check. Directory scans
/// skip hidden entries and respect gitignore rules; `recursive = false` stays
/// at the top level.
pub fn iter_files(target: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        return Err(Error::Discovery(format!(
            "target not found: {}",
            target.display()
        )));
    }

    let mut builder = WalkBuilder::new(target);
    builder.standard_filters(true);
    if !recursive {
        builder.max_depth(Some(1));
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(|e| Error::Discovery(e.to_string()))?;
        let path = entry.path();
        if path.is_file() && has_review_ext(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn has_review_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| REVIEW_EXTS.contains(&e.as_str()))
}

/// Read a file as text, replacing invalid UTF-8 instead of failing.
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
