//! Error types for file and configuration operations.
//!
//! Structural no-ops (empty landmark sets, closed masks, refused tool
//! transitions) are not errors and never show up here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::ImageSize;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Line {line}: expected header 'Index<TAB>xSource<TAB>ySource<TAB>xTarget<TAB>yTarget'")]
    MissingHeader { line: usize },

    #[error("Line {line}: expected 5 tab-separated fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("Line {line}: invalid {field} value '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Landmark count mismatch: {source_count} source points, {target_count} target points")]
    CountMismatch {
        source_count: usize,
        target_count: usize,
    },

    #[error("Failed to decode mask image '{path}': {source}")]
    MaskDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode mask image '{path}': {source}")]
    MaskEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Mask size mismatch: expected {expected}, got {actual}")]
    MaskSizeMismatch {
        expected: ImageSize,
        actual: ImageSize,
    },

    #[error("Raster length {len} does not match mask size {size}")]
    RasterLength { len: usize, size: ImageSize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Format(#[from] common::FormatError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_line_numbers() {
        let err = Error::FieldCount { line: 3, found: 2 };
        assert_eq!(
            err.to_string(),
            "Line 3: expected 5 tab-separated fields, found 2"
        );

        let err = Error::InvalidNumber {
            line: 7,
            field: "yTarget",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Line 7: invalid yTarget value 'abc'");
    }

    #[test]
    fn size_mismatch_message() {
        let err = Error::MaskSizeMismatch {
            expected: ImageSize::new(100, 50),
            actual: ImageSize::new(64, 64),
        };
        assert_eq!(
            err.to_string(),
            "Mask size mismatch: expected 100x50, got 64x64"
        );
    }
}
