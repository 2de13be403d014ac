//! PDF inspection and generation on top of lopdf.

pub mod images;
pub mod writer;

pub use images::{page_images, ExtractedImage};
pub use writer::PdfWriter;

use crate::error::{Error, Result};
use crate::files;
use log::{info, warn};
use lopdf::Document;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Open a PDF, retrying from an in-memory buffer when the direct load
/// fails. The buffered parse recovers some documents with trailing junk
/// or odd cross-reference tables.
pub fn open_document(path: &Path) -> Result<Document> {
    match Document::load(path) {
        Ok(doc) => Ok(doc),
        Err(first) => {
            warn!(
                "direct load of {} failed ({first}), retrying from buffer",
                path.display()
            );
            let bytes = std::fs::read(path)?;
            Document::load_mem(&bytes)
                .map_err(|e| Error::InvalidPdf(format!("{}: {e}", path.display())))
        }
    }
}

/// Validate a PDF input file and return the opened document.
///
/// Checks existence, extension, non-zero size, the `%PDF-` header, and
/// that the document has at least one page.
pub fn validate_pdf(path: &Path) -> Result<Document> {
    files::validate_exists(path)?;
    files::validate_extension(path, &["pdf"])?;
    files::validate_non_empty(path)?;

    let header = read_header(path)?;
    if !files::is_pdf_file(&header) {
        return Err(Error::InvalidPdf(format!(
            "{} does not start with a PDF header",
            path.display()
        )));
    }

    let doc = open_document(path)?;
    if doc.get_pages().is_empty() {
        return Err(Error::InvalidPdf(format!(
            "{} has no pages",
            path.display()
        )));
    }
    Ok(doc)
}

fn read_header(path: &Path) -> Result<[u8; 5]> {
    use std::io::Read;
    let mut header = [0u8; 5];
    let mut file = std::fs::File::open(path)?;
    file.read_exact(&mut header)
        .map_err(|_| Error::EmptyFile(path.to_path_buf()))?;
    Ok(header)
}

/// Whether the document trailer carries an `/Encrypt` entry.
pub fn is_encrypted(doc: &Document) -> bool {
    doc.trailer.get(b"Encrypt").is_ok()
}

/// Best-effort removal of soft (blank-password) protection.
///
/// Drops the `/Encrypt` trailer entry so downstream processing treats the
/// document as plain. This only helps with empty-password protection where
/// the object streams are readable anyway; it is not decryption and must
/// never be relied on as a security feature. Allowed to fail silently:
/// returns whether anything was stripped.
pub fn strip_soft_encryption(doc: &mut Document) -> bool {
    if doc.trailer.remove(b"Encrypt").is_some() {
        info!("stripped /Encrypt trailer entry (soft protection)");
        true
    } else {
        false
    }
}

/// Extract the text of one page (1-based page number from `get_pages`)
/// as trimmed, non-empty, NFC-normalized lines in document order.
pub fn page_text_lines(doc: &Document, page_number: u32) -> Result<Vec<String>> {
    let text = doc.extract_text(&[page_number])?;
    Ok(text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.nfc().collect::<String>())
        .collect())
}
