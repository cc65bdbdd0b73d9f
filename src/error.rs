//! Error types for the rescribe library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rescribe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A referenced input file (page TSV) does not exist.
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    /// A line or word record is missing required fields or has an
    /// unparseable bounding box. Contained per record, never fatal per page.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Invalid configuration value detected at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A block kind has no backing style in the style table.
    #[error("Missing style definition: {0}")]
    MissingStyle(String),

    /// Error while serializing output content.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Every input page failed to parse.
    #[error("All {0} input pages failed")]
    AllPagesFailed(usize),

    /// XML serialization error in the ODT container.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP container error.
    #[error("Container error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingStyle("Footnote".to_string());
        assert_eq!(err.to_string(), "Missing style definition: Footnote");

        let err = Error::AllPagesFailed(7);
        assert_eq!(err.to_string(), "All 7 input pages failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
