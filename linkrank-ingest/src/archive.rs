use crate::error::{IngestError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

/// Directory a bundle extracts into: the bundle path minus its `.zip`
/// suffix, alongside the bundle itself.
pub fn extraction_root(zip_path: &Path) -> PathBuf {
    let stem = zip_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    zip_path.with_file_name(stem)
}

/// Extracts every entry of the bundle into its extraction root and
/// returns that root.
///
/// Entry names that would escape the root (absolute paths, `..`
/// components) abort the extraction.
pub fn extract(zip_path: &Path) -> Result<PathBuf> {
    let root = extraction_root(zip_path);
    fs::create_dir_all(&root)?;

    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    info!(
        "Extracting {} entries from {}",
        archive.len(),
        zip_path.display()
    );

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(IngestError::UnsafeEntryPath(entry.name().to_string()));
        };
        let out_path = root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        let written = io::copy(&mut entry, &mut out_file)?;
        debug!("Extracted {} ({} bytes)", out_path.display(), written);
    }

    Ok(root)
}
