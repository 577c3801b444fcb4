// Import module - operations input: path resolution, JSON parsing, validation

pub mod input_path;
pub mod operations_json;
pub mod validation;

use anyhow::Context;
use std::io::Read;
use tracing::info;

use crate::error::Result;
use crate::models::Batch;

pub use input_path::{candidate_paths, resolve_input_path};
pub use operations_json::parse_operations;
pub use validation::{validate_batches, ValidationIssue, ValidationResult};

/// Source name that selects standard input instead of a file
pub const STDIN_SOURCE: &str = "-";

/// Read the raw input text from a file path (with fallback directories) or
/// from stdin when `source` is `-`.
pub fn read_input(source: &str) -> Result<String> {
    if source == STDIN_SOURCE {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read operations from stdin")?;
        return Ok(content);
    }

    let path = resolve_input_path(source)?;
    info!("Reading operations from {}", path.display());
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read input file {}", path.display()))
}

/// Read and parse all batches from `source`.
pub fn import_operations(source: &str) -> Result<Vec<Batch>> {
    let content = read_input(source)?;
    parse_operations(&content).with_context(|| format!("Invalid operations in {}", source))
}
