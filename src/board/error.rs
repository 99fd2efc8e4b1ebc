//! Error types for board document operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::fanout::FanoutError;

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors that can occur while loading, querying or modifying a board.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Failed to open or read the file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write the file.
    #[error("Failed to write file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The board document is not valid JSON for the board model.
    #[error("Invalid board document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A pad references a net code the board does not define.
    #[error("Pad {pad} of {reference} references unknown net {net}")]
    UnknownNet {
        /// Footprint reference designator.
        reference: String,
        /// Pad number.
        pad: String,
        /// Net code.
        net: u32,
    },

    /// A net's class is missing and there is no "Default" class to fall back on.
    #[error("Net '{net}' uses unknown net class '{class}'")]
    UnknownNetClass {
        /// Net name.
        net: String,
        /// Class name.
        class: String,
    },

    /// No footprint carries the requested reference designator.
    #[error("Footprint not found: {reference}")]
    FootprintNotFound {
        /// Reference designator that was not found.
        reference: String,
    },

    /// The fanout of a footprint failed.
    #[error("Fanout of {reference} failed")]
    Fanout {
        /// Footprint reference designator.
        reference: String,
        /// The underlying fanout error.
        #[source]
        source: FanoutError,
    },
}

impl BoardError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a fanout error for the given footprint.
    pub fn fanout(reference: impl Into<String>, source: FanoutError) -> Self {
        Self::Fanout {
            reference: reference.into(),
            source,
        }
    }

    /// Returns the fanout error, if this is one.
    #[must_use]
    pub const fn as_fanout(&self) -> Option<&FanoutError> {
        match self {
            Self::Fanout { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn fanout_error_keeps_source() {
        let err = BoardError::fanout("U3", FanoutError::NoReferenceNet);
        assert!(err.to_string().contains("U3"));
        assert_eq!(err.as_fanout(), Some(&FanoutError::NoReferenceNet));
        assert!(err.source().is_some());
    }

    #[test]
    fn unknown_net_display() {
        let err = BoardError::UnknownNet {
            reference: "U1".to_string(),
            pad: "B7".to_string(),
            net: 99,
        };
        let msg = err.to_string();
        assert!(msg.contains("B7"));
        assert!(msg.contains("99"));
    }
}
