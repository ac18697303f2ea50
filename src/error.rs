//! Error types shared by the editor core and its adapters.
//!
//! Structural requests that make no sense (an out-of-range row, undo with an
//! empty log, backspace at the start of the document) are absorbed as no-ops by
//! the operations themselves and never show up here. What remains are the
//! failures a caller has to report: file I/O, terminal I/O and bad arguments.

use std::path::PathBuf;
use thiserror::Error;

/// Editor-wide error type
#[derive(Error, Debug)]
pub enum EditorError {
    /// Reading or writing a document failed
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Save was requested for a buffer that has never been given a filename
    #[error("no filename set for buffer")]
    NoFilename,

    /// The terminal adapter failed to read input or draw a frame
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The log file could not be opened or the logger was already installed
    #[error("logger setup failed: {0}")]
    Logger(String),

    /// Bad command-line usage
    #[error("{0}")]
    InvalidArgument(String),
}

impl EditorError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EditorError>;
