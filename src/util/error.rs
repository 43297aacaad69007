//! Error types for the groomcache library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for spline-cache decoding and export.
#[derive(Error, Debug)]
pub enum Error {
    /// Container structure cannot be decoded (truncated buffer, bad chunk
    /// header, unparseable manifest, out-of-range primitive run).
    #[error("Malformed spline cache: {0}")]
    MalformedContainer(String),

    /// Group uses an encoding this decoder does not implement.
    /// Base64-wrapped groups have never been observed in the wild; refusing
    /// is safer than guessing at the layout.
    #[error("Unsupported group encoding: {0}")]
    UnsupportedEncoding(&'static str),

    /// Deflate stream for a group is corrupt.
    #[error("Failed to decompress group {group}: {source}")]
    Decompression {
        group: u32,
        source: std::io::Error,
    },

    /// Packed address names a group past the end of the data blocks.
    #[error("Group {group} out of bounds (container has {count} data blocks)")]
    GroupOutOfBounds { group: u32, count: usize },

    /// Packed address names a sub-block past the end of its group.
    #[error("Block {index} out of bounds in group {group} ({count} blocks)")]
    BlockOutOfBounds { group: u32, index: u32, count: usize },

    /// Blob file does not exist or cannot be accessed.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Memory mapping failed.
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message (sink-side failures and the like).
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed-container error from a message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedContainer(msg.into())
    }

    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type alias for groomcache operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::UnsupportedEncoding("base64");
        assert!(e.to_string().contains("base64"));

        let e = Error::BlockOutOfBounds { group: 2, index: 7, count: 3 };
        assert!(e.to_string().contains("7"));
        assert!(e.to_string().contains("3"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
