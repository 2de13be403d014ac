//! PDF to DOCX with an ordered fallback chain.
//!
//! Three methods, tried in a fixed order when the method is `auto`:
//! the one-pass office host import, the embedded extractor (text plus
//! images), and the text-only extractor. An explicit method runs alone
//! and re-raises its own failure instead of falling back.

use crate::capability::Capabilities;
use crate::convert::ConversionStrategy;
use crate::docx::DocxBuilder;
use crate::error::{Error, Result};
use crate::files;
use crate::pdf;
use log::{info, warn};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Conversion method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Try every method in order, stopping at the first success.
    Auto,
    /// One-pass import through the office host.
    Office,
    /// Extract text and embedded images page by page.
    Embedded,
    /// Extract text only.
    TextOnly,
}

impl Method {
    /// The fixed fallback order `auto` walks.
    pub const CHAIN: [Method; 3] = [Method::Office, Method::Embedded, Method::TextOnly];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Auto => "auto",
            Method::Office => "office",
            Method::Embedded => "embedded",
            Method::TextOnly => "text-only",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Method::Auto),
            "office" => Ok(Method::Office),
            "embedded" => Ok(Method::Embedded),
            "text-only" | "text_only" => Ok(Method::TextOnly),
            other => Err(Error::UnsupportedConversion(format!(
                "unknown pdf-to-docx method: {other}"
            ))),
        }
    }
}

/// Strategy for converting PDF to DOCX.
pub struct PdfToDocxStrategy {
    capabilities: Capabilities,
    default_method: Method,
}

impl PdfToDocxStrategy {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            default_method: Method::Auto,
        }
    }

    /// Override the default method for this strategy instance.
    pub fn with_method(mut self, method: Method) -> Self {
        self.default_method = method;
        self
    }

    /// Convert with an explicit method selection.
    pub fn convert_with_method(&self, input: &Path, output: &Path, method: Method) -> Result<()> {
        self.validate_input(input)?;
        info!(
            "converting {} to DOCX (method: {method})",
            input.display()
        );

        match method {
            Method::Auto => self.run_chain(input, output),
            single => {
                self.attempt(single, input, output)?;
                self.validate_output(output)
            }
        }
    }

    /// Walk the fallback chain, stopping at the first validated success.
    fn run_chain(&self, input: &Path, output: &Path) -> Result<()> {
        let mut failures: Vec<String> = Vec::new();

        for method in Method::CHAIN {
            match self
                .attempt(method, input, output)
                .and_then(|()| self.validate_output(output))
            {
                Ok(()) => {
                    info!("method {method} succeeded");
                    return Ok(());
                }
                Err(e) => {
                    warn!("method {method} failed: {e}");
                    failures.push(format!("{method}: {e}"));
                }
            }
        }

        Err(Error::AllMethodsFailed(failures.join("; ")))
    }

    fn attempt(&self, method: Method, input: &Path, output: &Path) -> Result<()> {
        match method {
            Method::Auto => unreachable!("auto is resolved by the driver"),
            Method::Office => self.attempt_office(input, output),
            Method::Embedded => self.attempt_extract(input, output, true),
            Method::TextOnly => self.attempt_extract(input, output, false),
        }
    }

    /// One black-box pass through the office host.
    fn attempt_office(&self, input: &Path, output: &Path) -> Result<()> {
        let host = self.capabilities.office().ok_or_else(|| {
            Error::MissingDependency("office host (LibreOffice) not detected".to_string())
        })?;
        host.save_as(input, output)
    }

    /// Per-page extraction into a fresh DOCX package.
    fn attempt_extract(&self, input: &Path, output: &Path, with_images: bool) -> Result<()> {
        let doc = pdf::open_document(input)?;
        let pages = doc.get_pages();
        let page_count = pages.len();
        let mut builder = DocxBuilder::new();

        for (index, (page_number, page_id)) in pages.iter().enumerate() {
            if with_images {
                let images = pdf::page_images(&doc, *page_id);
                if !images.is_empty() {
                    info!("page {page_number}: {} image(s)", images.len());
                }
                for img in images {
                    builder.add_image(img.data, img.kind, img.width, img.height);
                }
            }

            for line in pdf::page_text_lines(&doc, *page_number)? {
                builder.add_paragraph(line);
            }

            if index + 1 < page_count {
                builder.add_page_break();
            }
        }

        builder.save(output)
    }

    /// Coarse container check: exists, non-zero, ZIP signature.
    fn validate_output(&self, output: &Path) -> Result<()> {
        files::validate_exists(output)
            .and_then(|()| files::validate_non_empty(output))
            .map_err(|_| {
                Error::InvalidOutput(format!("no usable output at {}", output.display()))
            })?;

        let mut header = [0u8; 4];
        use std::io::Read;
        std::fs::File::open(output)?
            .read_exact(&mut header)
            .map_err(|_| {
                Error::InvalidOutput(format!(
                    "{} is too short to be a DOCX container",
                    output.display()
                ))
            })?;
        if !files::is_zip_file(&header) {
            return Err(Error::InvalidOutput(format!(
                "{} is not a DOCX container",
                output.display()
            )));
        }
        Ok(())
    }
}

impl ConversionStrategy for PdfToDocxStrategy {
    fn validate_input(&self, input: &Path) -> Result<()> {
        pdf::validate_pdf(input).map(|_| ())
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.convert_with_method(input, output, self.default_method)
    }
}
