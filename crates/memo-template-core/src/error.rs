//! Error types for template cleaning

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, cleaning or saving a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing or writing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Input template does not exist
    #[error("Template file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Missing required part in the container
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Entry is encrypted and cannot be rewritten
    #[error("Encrypted entry is not supported: {0}")]
    EncryptedEntry(String),

    /// Document XML does not have the expected shape
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// Replacement texts do not line up with the paragraph sequence
    #[error("Expected {expected} paragraph texts, got {actual}")]
    ParagraphCountMismatch {
        /// Paragraphs in the document
        expected: usize,
        /// Texts supplied
        actual: usize,
    },

    /// A replacement rule pattern failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as written in the configuration
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error in {}: {message}", path.display())]
    Config {
        /// Configuration file path
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

impl From<std::string::FromUtf8Error> for TemplateError {
    #[inline]
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::InvalidStructure(format!("part is not valid UTF-8: {err}"))
    }
}
