//! Error types for the docshift library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docshift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during conversion and compression.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file does not exist.
    #[error("File not found: {0}")]
    InputNotFound(PathBuf),

    /// The input file is empty or below the minimum usable size.
    #[error("File is empty or too small: {0}")]
    EmptyFile(PathBuf),

    /// The file extension is not in the allowed set for this operation.
    #[error("Unsupported extension `{extension}` (expected one of: {allowed})")]
    UnsupportedExtension { extension: String, allowed: String },

    /// The requested conversion type is not registered.
    #[error("Unsupported conversion type: {0}")]
    UnsupportedConversion(String),

    /// A required external dependency is absent.
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// The external office host failed mid-operation.
    #[error("Office host error: {0}")]
    OfficeHost(String),

    /// A conversion failed in the underlying machinery.
    #[error("{kind} conversion failed: {source}")]
    ConversionFailed {
        kind: String,
        #[source]
        source: Box<Error>,
    },

    /// Every method in a fallback chain failed.
    #[error("All conversion methods failed: {0}")]
    AllMethodsFailed(String),

    /// The produced output file is missing, empty, or has the wrong signature.
    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    /// The input PDF is missing, malformed, or has no pages.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// Error from the PDF object layer.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error reading or writing a ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error decoding or encoding a raster image.
    #[error("Image error: {0}")]
    Image(String),
}

impl Error {
    /// Wrap an error with the conversion kind it surfaced from.
    pub fn in_conversion(kind: impl Into<String>, source: Error) -> Self {
        Error::ConversionFailed {
            kind: kind.into(),
            source: Box::new(source),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
