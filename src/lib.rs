//! # docshift
//!
//! Office document conversion and size compression.
//!
//! This library converts between DOC/DOCX and PDF and shrinks PDF/DOCX
//! files by re-encoding their embedded raster content. Three conversion
//! paths are registered behind a single engine; compression is an
//! independent path keyed by named levels.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docshift::{compress_file, convert_file, ConversionKind, Level};
//!
//! // Convert a document
//! convert_file(ConversionKind::DocToPdf, "report.docx", "report.pdf")?;
//!
//! // Compress a file
//! let stats = compress_file("slides.pdf", "slides_small.pdf", Level::High)?;
//! println!("saved {:.1}%", stats.reduction_percent());
//! # Ok::<(), docshift::Error>(())
//! ```
//!
//! ## Engine API
//!
//! ```no_run
//! use docshift::{ConversionEngine, ConvertOptions, ConversionKind, Method};
//! use std::path::Path;
//!
//! let engine = ConversionEngine::detect();
//! engine.convert(
//!     ConversionKind::PdfToDocx,
//!     Path::new("input.pdf"),
//!     Path::new("output.docx"),
//!     &ConvertOptions::with_method(Method::TextOnly),
//! )?;
//! # Ok::<(), docshift::Error>(())
//! ```
//!
//! Conversions that involve the legacy `.doc` format need an office host
//! (LibreOffice) on the PATH; everything else runs built-in.

pub mod capability;
pub mod compress;
pub mod convert;
pub mod docx;
pub mod engine;
pub mod error;
pub mod files;
pub mod office;
pub mod pdf;

// Re-exports
pub use capability::{Capabilities, CapabilityReport};
pub use compress::{compress_folder, BatchReport, CompressionStats, Level};
pub use convert::{ConversionStrategy, Method};
pub use engine::{ConversionEngine, ConversionKind, ConvertOptions, SupportedConversion};
pub use error::{Error, Result};
pub use office::OfficeHost;

use std::path::Path;

/// Convert a document with a freshly detected engine.
///
/// # Example
///
/// ```no_run
/// use docshift::{convert_file, ConversionKind};
///
/// convert_file(ConversionKind::PdfToDocx, "input.pdf", "output.docx")?;
/// # Ok::<(), docshift::Error>(())
/// ```
pub fn convert_file(
    kind: ConversionKind,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<()> {
    let engine = ConversionEngine::detect();
    engine.convert(
        kind,
        input.as_ref(),
        output.as_ref(),
        &ConvertOptions::default(),
    )
}

/// Convert PDF to DOCX with an explicit method.
pub fn pdf_to_docx_with_method(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    method: Method,
) -> Result<()> {
    let engine = ConversionEngine::detect();
    engine.convert(
        ConversionKind::PdfToDocx,
        input.as_ref(),
        output.as_ref(),
        &ConvertOptions::with_method(method),
    )
}

/// Compress a single PDF or DOCX file.
///
/// # Example
///
/// ```no_run
/// use docshift::{compress_file, Level};
///
/// let stats = compress_file("deck.pdf", "deck_small.pdf", Level::Medium)?;
/// println!("-{:.1}%", stats.reduction_percent());
/// # Ok::<(), docshift::Error>(())
/// ```
pub fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    level: Level,
) -> Result<CompressionStats> {
    compress::compress(input.as_ref(), output.as_ref(), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_file_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"text").unwrap();
        let result = compress_file(&input, dir.path().join("out.txt"), Level::Low);
        assert!(matches!(result, Err(Error::UnsupportedExtension { .. })));
    }
}
