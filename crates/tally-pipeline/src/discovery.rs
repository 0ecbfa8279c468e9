//! Input file discovery

use crate::error::PipelineError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Suffix a file name must end with to be processed (case-sensitive)
pub const PDF_EXTENSION: &str = ".pdf";

/// Result of scanning the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// The directory does not exist
    MissingDirectory,
    /// Eligible files, sorted by file name (possibly empty)
    Files(Vec<PathBuf>),
}

/// List the `.pdf` files directly inside `dir`
///
/// Subdirectories are not descended into, and entries that are not regular files
/// are ignored even when their name ends in `.pdf`.
pub fn discover_pdfs(dir: &Path) -> Result<Discovery, PipelineError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Discovery::MissingDirectory),
        Err(source) => {
            return Err(PipelineError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        // Compared on raw bytes so names that are not valid UTF-8 still qualify
        let eligible = path
            .file_name()
            .is_some_and(|name| name.as_encoded_bytes().ends_with(PDF_EXTENSION.as_bytes()));
        if eligible && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(Discovery::Files(files))
}
