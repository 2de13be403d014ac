//! DOC/DOCX to PDF.
//!
//! `.docx` inputs go through the built-in text renderer; legacy `.doc`
//! inputs need the office host, which alone understands the binary format.

use crate::capability::Capabilities;
use crate::convert::ConversionStrategy;
use crate::docx::{self, DocxBlock};
use crate::error::{Error, Result};
use crate::files;
use crate::pdf::PdfWriter;
use log::info;
use std::path::Path;

/// Strategy for converting DOC/DOCX to PDF.
pub struct DocToPdfStrategy {
    capabilities: Capabilities,
}

impl DocToPdfStrategy {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Built-in path: extract the flat block list and lay it out as text.
    fn convert_docx_builtin(&self, input: &Path, output: &Path) -> Result<()> {
        info!("converting {} with the built-in renderer", input.display());
        let blocks = docx::read_blocks(input)?;

        let mut writer = PdfWriter::new();
        for block in blocks {
            match block {
                DocxBlock::Paragraph(text) => writer.add_paragraph(&text),
                DocxBlock::PageBreak => writer.add_page_break(),
                // The text renderer carries no raster content.
                DocxBlock::Image { .. } => {}
            }
        }
        writer.save(output)?;
        files::validate_non_empty(output)
            .map_err(|_| Error::InvalidOutput(format!("empty PDF at {}", output.display())))
    }

    fn convert_doc_via_host(&self, input: &Path, output: &Path) -> Result<()> {
        let host = self.capabilities.office().ok_or_else(|| {
            Error::MissingDependency(
                "converting .doc to PDF requires an office host (LibreOffice)".to_string(),
            )
        })?;
        info!("converting {} via office host", input.display());
        host.save_as(input, output)
    }
}

impl ConversionStrategy for DocToPdfStrategy {
    fn validate_input(&self, input: &Path) -> Result<()> {
        files::validate_exists(input)?;
        files::validate_extension(input, &["doc", "docx"])?;

        if files::extension(input) == "doc" {
            // Capability check first, then the one-time live verification.
            let host = self.capabilities.office().ok_or_else(|| {
                Error::MissingDependency(
                    "converting .doc to PDF requires an office host (LibreOffice)".to_string(),
                )
            })?;
            host.verify()?;
        }
        Ok(())
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.validate_input(input)?;
        match files::extension(input).as_str() {
            "docx" => self.convert_docx_builtin(input, output),
            "doc" => self.convert_doc_via_host(input, output),
            // validate_input already rejected anything else
            other => Err(Error::UnsupportedExtension {
                extension: format!(".{other}"),
                allowed: ".doc, .docx".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::DocxBuilder;

    #[test]
    fn test_validate_rejects_wrong_extension() {
        let strategy = DocToPdfStrategy::new(Capabilities::none());
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"text").unwrap();
        let err = strategy.validate_input(&input).unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension { .. }));
    }

    #[test]
    fn test_doc_without_host_is_capability_error() {
        let strategy = DocToPdfStrategy::new(Capabilities::none());
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("legacy.doc");
        std::fs::write(&input, b"\xD0\xCF\x11\xE0").unwrap();
        let err = strategy.validate_input(&input).unwrap_err();
        assert!(matches!(err, Error::MissingDependency(_)));
    }

    #[test]
    fn test_docx_builtin_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.docx");
        let output = dir.path().join("report.pdf");

        let mut builder = DocxBuilder::new();
        builder.add_paragraph("Quarterly report");
        builder.add_page_break();
        builder.add_paragraph("Numbers went up");
        builder.save(&input).unwrap();

        let strategy = DocToPdfStrategy::new(Capabilities::none());
        strategy.convert(&input, &output).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert!(files::is_pdf_file(&bytes));

        let doc = crate::pdf::open_document(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        let text = crate::pdf::page_text_lines(&doc, 1).unwrap().join("\n");
        assert!(text.contains("Quarterly report"));
    }

    #[test]
    fn test_missing_input() {
        let strategy = DocToPdfStrategy::new(Capabilities::none());
        let err = strategy
            .validate_input(Path::new("/nonexistent/file.docx"))
            .unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}
