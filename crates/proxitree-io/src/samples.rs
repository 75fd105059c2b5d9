//! Parsing the sample row and computing its checksum.
//!
//! A sample file holds comma-separated integers.  Only the last non-empty
//! line is used; earlier lines (headers, previous weeks) are ignored.

use sha2::{Digest, Sha256};

use crate::IoError;

/// One parsed row of samples.
///
/// Keeps the raw fields next to the parsed values because the checksum
/// is computed over the text exactly as the file stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    fields: Vec<String>,
    values: Vec<i64>,
}

impl SampleRow {
    /// Parsed sample values, in file order.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Raw fields, in file order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Lower-case hex SHA-256 of all raw fields concatenated without
    /// separators.
    ///
    /// # Examples
    ///
    /// ```
    /// let row = proxitree_io::parse_samples("1,3,2").unwrap();
    /// assert_eq!(
    ///     row.digest(),
    ///     "dbb1ded63bc70732626c5dfe6c7f50ced3d560e970f30b15335ac290358748f6",
    /// );
    /// ```
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for field in &self.fields {
            hasher.update(field.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Check the row digest against an expected hex checksum.
    ///
    /// Comparison ignores case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::ChecksumMismatch`] when the digests differ.
    pub fn verify(&self, expected: &str) -> Result<(), IoError> {
        let actual = self.digest();
        let expected = expected.trim();
        if actual.eq_ignore_ascii_case(expected) {
            tracing::debug!(checksum = %actual, "checksum verified");
            Ok(())
        } else {
            Err(IoError::ChecksumMismatch {
                expected: expected.to_string(),
                actual,
            })
        }
    }
}

/// Parse the last non-empty line of `text` into samples.
///
/// Fields may carry surrounding whitespace.
///
/// # Errors
///
/// Returns [`IoError::NoSamples`] if every line is blank, and
/// [`IoError::InvalidSample`] for the first field that is not an `i64`.
pub fn parse_samples(text: &str) -> Result<SampleRow, IoError> {
    let line = text
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .ok_or(IoError::NoSamples)?;

    let fields: Vec<String> = line.split(',').map(str::to_string).collect();
    let values = fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            field
                .trim()
                .parse::<i64>()
                .map_err(|_| IoError::InvalidSample {
                    index,
                    value: field.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(samples = values.len(), "parsed sample row");
    Ok(SampleRow { fields, values })
}
