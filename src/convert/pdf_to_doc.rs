//! PDF to legacy DOC.
//!
//! Two-phase composite: PDF -> intermediate DOCX (delegated to
//! [`PdfToDocxStrategy`]), then DOCX -> DOC through the office host. The
//! intermediate lives in a [`tempfile::TempDir`], so it is removed on
//! success, failure, and panic alike.

use crate::capability::Capabilities;
use crate::convert::{ConversionStrategy, PdfToDocxStrategy};
use crate::error::{Error, Result};
use crate::files;
use crate::pdf;
use log::info;
use std::path::Path;

/// Strategy for converting PDF to DOC.
pub struct PdfToDocStrategy {
    capabilities: Capabilities,
    pdf_to_docx: PdfToDocxStrategy,
}

impl PdfToDocStrategy {
    pub fn new(capabilities: Capabilities) -> Self {
        let pdf_to_docx = PdfToDocxStrategy::new(capabilities.clone());
        Self {
            capabilities,
            pdf_to_docx,
        }
    }
}

impl ConversionStrategy for PdfToDocStrategy {
    fn validate_input(&self, input: &Path) -> Result<()> {
        // Capability first: fail fast before touching the input.
        let host = self.capabilities.office().ok_or_else(|| {
            Error::MissingDependency(
                "converting PDF to DOC requires an office host (LibreOffice); \
                 install it and make sure `soffice` is on PATH"
                    .to_string(),
            )
        })?;
        host.verify()?;
        pdf::validate_pdf(input).map(|_| ())
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.validate_input(input)?;

        let workdir = tempfile::tempdir()?;
        let intermediate = workdir.path().join("intermediate.docx");

        info!("phase 1: converting {} to intermediate DOCX", input.display());
        self.pdf_to_docx.convert(input, &intermediate)?;
        files::validate_non_empty(&intermediate).map_err(|_| {
            Error::InvalidOutput("intermediate DOCX is missing or empty".to_string())
        })?;

        info!("phase 2: re-saving intermediate as DOC via office host");
        let host = self.capabilities.office().ok_or_else(|| {
            Error::MissingDependency("office host disappeared between validation and use".into())
        })?;
        host.save_as(&intermediate, output)?;

        files::validate_non_empty(output)
            .map_err(|_| Error::InvalidOutput(format!("empty DOC at {}", output.display())))
        // workdir drops here, removing the intermediate on every path
    }
}
