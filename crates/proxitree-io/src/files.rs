//! Filesystem access: reading sample files and writing SVG documents.

use std::path::Path;

use crate::IoError;
use crate::samples::{SampleRow, parse_samples};

/// Read a sample file and parse its last row.
///
/// # Errors
///
/// Returns [`IoError::Read`] if the file cannot be read, or any error
/// from [`parse_samples`].
pub fn read_samples(path: &Path) -> Result<SampleRow, IoError> {
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let row = parse_samples(&text)?;
    tracing::info!(
        path = %path.display(),
        samples = row.values().len(),
        "read samples"
    );
    Ok(row)
}

/// Write an SVG document to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`IoError::Write`] if the file cannot be written.
pub fn write_svg(path: &Path, svg: &str) -> Result<(), IoError> {
    std::fs::write(path, svg).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = svg.len(), "wrote svg");
    Ok(())
}
