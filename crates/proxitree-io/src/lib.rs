//! proxitree-io: sample files in, SVG files out.
//!
//! Reads the comma-separated sample row, verifies its SHA-256 checksum,
//! and writes rendered SVG documents to disk.  Everything that touches
//! the filesystem lives here so `proxitree-graph` and `proxitree-export`
//! stay pure.

use std::path::PathBuf;

pub mod files;
pub mod samples;

pub use files::{read_samples, write_svg};
pub use samples::{SampleRow, parse_samples};

/// Errors from reading, parsing, verifying, or writing files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The sample file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The input contained no non-empty line.
    #[error("no samples found")]
    NoSamples,

    /// A field was not an integer.
    #[error("sample {index} is not an integer: {value:?}")]
    InvalidSample {
        /// Zero-based field position within the row.
        index: usize,
        /// The field as it appeared in the file.
        value: String,
    },

    /// The row digest differs from the expected checksum.
    #[error("checksum mismatch: expected {expected}, actual {actual}")]
    ChecksumMismatch {
        /// Checksum the caller asked for.
        expected: String,
        /// Lower-case hex digest of the row.
        actual: String,
    },
}
