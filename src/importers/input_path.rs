use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{CapitalGainError, Result};

/// Directories searched, in order, when the given input path does not exist.
/// Covers running from the project root and from the container image.
const FALLBACK_DIRS: [&str; 4] = ["inputs", "/app/inputs", "test-inputs", "/app/test-inputs"];

/// Ordered list of paths tried for `path`: the path itself, then its file
/// name under each fallback directory.
pub fn candidate_paths<P: AsRef<Path>>(path: P) -> Vec<PathBuf> {
    let path = path.as_ref();
    let mut candidates = vec![path.to_path_buf()];

    if let Some(file_name) = path.file_name() {
        candidates.extend(FALLBACK_DIRS.iter().map(|dir| Path::new(dir).join(file_name)));
    }

    candidates
}

/// Resolve the input file, falling back to the well-known input directories.
pub fn resolve_input_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    match candidate_paths(path).into_iter().skip(1).find(|c| c.is_file()) {
        Some(found) => {
            info!("Input file found at {}", found.display());
            Ok(found)
        }
        None => Err(CapitalGainError::InputNotFound(format!(
            "'{}' (also looked in {}); check the path or pass --input",
            path.display(),
            FALLBACK_DIRS.join(", ")
        ))
        .into()),
    }
}
