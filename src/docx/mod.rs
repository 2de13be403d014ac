//! Minimal OOXML (DOCX) reading and writing.
//!
//! This is deliberately not a document object model: conversions only need
//! a flat list of paragraph texts, raster images, and page breaks.

pub mod reader;
pub mod writer;

pub use reader::{extract_paragraph_text, read_blocks};
pub use writer::DocxBuilder;

/// Raster formats a DOCX package can embed through this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// File extension used under `word/media/`.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
        }
    }

    /// MIME content type for `[Content_Types].xml`.
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }
}

/// One flat content block of a document.
#[derive(Debug, Clone)]
pub enum DocxBlock {
    /// A paragraph of plain text.
    Paragraph(String),
    /// An embedded raster image with its pixel dimensions.
    Image {
        data: Vec<u8>,
        kind: ImageKind,
        width_px: u32,
        height_px: u32,
    },
    /// An explicit page break.
    PageBreak,
}
