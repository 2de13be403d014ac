//! Conversion strategies.
//!
//! Each strategy implements one conversion path behind the uniform
//! [`ConversionStrategy`] contract; the engine owns one instance of each
//! and dispatches by conversion kind.

pub mod doc_to_pdf;
pub mod pdf_to_doc;
pub mod pdf_to_docx;

pub use doc_to_pdf::DocToPdfStrategy;
pub use pdf_to_doc::PdfToDocStrategy;
pub use pdf_to_docx::{Method, PdfToDocxStrategy};

use crate::error::Result;
use std::path::Path;

/// Uniform contract every conversion path implements.
pub trait ConversionStrategy {
    /// Validate the input file for this path without converting.
    fn validate_input(&self, input: &Path) -> Result<()>;

    /// Convert `input` into `output`, writing the output file on success.
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}
