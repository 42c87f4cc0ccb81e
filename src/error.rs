use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnrError>;

/// Errors raised while loading, aligning or measuring a catalog entry.
#[derive(Error, Debug)]
pub enum SnrError {
    /// The file could not be opened, probed or decoded.
    #[error("Failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// A signal had no samples to measure.
    #[error("Degenerate signal: {0}")]
    DegenerateSignal(String),

    #[error("Length mismatch: reference has {reference} samples, test has {test}")]
    LengthMismatch { reference: usize, test: usize },

    /// A catalog entry failed; wraps the underlying cause with its label.
    #[error("{algorithm}: {source}")]
    Entry {
        algorithm: String,
        source: Box<SnrError>,
    },

    #[error("Invalid catalog: {0}")]
    Catalog(String),
}

impl SnrError {
    pub(crate) fn load(path: &std::path::Path, message: impl ToString) -> Self {
        SnrError::Load {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}
