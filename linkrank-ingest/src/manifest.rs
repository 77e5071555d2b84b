use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Enumerates the plain files sitting directly in the extraction root.
/// Subdirectories are not descended into; each listed file is expected to
/// hold one WAT envelope.
pub fn build_manifest(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        if dir_entry.file_type()?.is_file() {
            files.push(dir_entry.path());
        }
    }
    files.sort();
    info!("Manifest holds {} files from {}", files.len(), dir.display());
    Ok(files)
}

/// Persists a manifest as one absolute path per line.
pub fn write_manifest(files: &[PathBuf], manifest_path: &Path) -> Result<()> {
    let mut out = fs::File::create(manifest_path)?;
    for file in files {
        writeln!(out, "{}", file.display())?;
    }
    Ok(())
}

/// Loads a manifest written by [`write_manifest`], skipping blank lines.
pub fn read_manifest(manifest_path: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(manifest_path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
