//! Small filesystem helpers used by the building blocks.

use crate::error::{BiobbError, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;

/// True when `path` is an existing, non-empty regular file.
pub fn nonempty(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Restart predicate: every listed output already exists non-empty.
pub fn outputs_ready<'a, I>(paths: I) -> bool
where
    I: IntoIterator<Item = &'a Path>,
{
    paths.into_iter().all(nonempty)
}

/// Create the parent directories of an output path.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Archive the given files into a deflate-compressed zip, one entry per file
/// basename. Duplicate basenames are rejected.
pub fn zip_files(zip_path: &Path, files: &[PathBuf]) -> Result<()> {
    ensure_parent(zip_path)?;
    let mut seen = BTreeSet::new();
    let mut writer = zip::ZipWriter::new(File::create(zip_path)?);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BiobbError::Config(format!("unusable archive entry: {}", path.display())))?;
        if !seen.insert(name.to_string()) {
            return Err(BiobbError::Config(format!("duplicate archive entry: {name}")));
        }
        writer.start_file(name, options)?;
        let mut contents = Vec::new();
        File::open(path)?.read_to_end(&mut contents)?;
        writer.write_all(&contents)?;
    }

    writer.finish()?;
    debug!("Wrote {} entries into {}", files.len(), zip_path.display());
    Ok(())
}
