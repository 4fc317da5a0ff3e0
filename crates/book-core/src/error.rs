//! Error types for book building and reading

use std::io;

use thiserror::Error;

/// The book file could not be used. Callers treat every variant as
/// "no book moves" and move on to the engine.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("Failed to read opening book: {0}")]
    Io(#[from] io::Error),

    #[error("Opening book length {len} is not a multiple of 16 bytes")]
    Length { len: usize },

    #[error("Opening book is not sorted by key at entry {index}")]
    Unsorted { index: usize },
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to read game source: {0}")]
    Source(io::Error),

    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("Failed to serialize profile: {0}")]
    Profile(#[from] serde_json::Error),
}

/// Rejected position or move input.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Illegal move {san}: {reason}")]
    IllegalMove { san: String, reason: String },
}
