//! Error handling for capital-gain
//!
//! Defines the boundary error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation. Besides input
//! handling, the tax engine fails only when values overflow.

use thiserror::Error;

/// Errors raised while reading, validating or processing input
#[derive(Error, Debug)]
pub enum CapitalGainError {
    #[error("failed to parse line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("input file not found: {0}")]
    InputNotFound(String),

    #[error("arithmetic overflow at operation {operation}; amounts or quantities are too large")]
    Overflow { operation: usize },
}

/// Result type alias for boundary operations
pub type Result<T> = anyhow::Result<T>;
