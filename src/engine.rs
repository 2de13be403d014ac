//! Conversion engine: kind registry and dispatch.

use crate::capability::Capabilities;
use crate::convert::{
    ConversionStrategy, DocToPdfStrategy, Method, PdfToDocStrategy, PdfToDocxStrategy,
};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The registered conversion types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    DocToPdf,
    PdfToDocx,
    PdfToDoc,
}

impl ConversionKind {
    /// All registered kinds, in display order.
    pub const ALL: [ConversionKind; 3] = [
        ConversionKind::DocToPdf,
        ConversionKind::PdfToDocx,
        ConversionKind::PdfToDoc,
    ];

    /// Canonical name (`doc_to_pdf`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            ConversionKind::DocToPdf => "doc_to_pdf",
            ConversionKind::PdfToDocx => "pdf_to_docx",
            ConversionKind::PdfToDoc => "pdf_to_doc",
        }
    }

    /// Extension (dot-free) of the files this kind produces.
    pub fn output_extension(&self) -> &'static str {
        match self {
            ConversionKind::DocToPdf => "pdf",
            ConversionKind::PdfToDocx => "docx",
            ConversionKind::PdfToDoc => "doc",
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ConversionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "doc_to_pdf" => Ok(ConversionKind::DocToPdf),
            "pdf_to_docx" => Ok(ConversionKind::PdfToDocx),
            "pdf_to_doc" => Ok(ConversionKind::PdfToDoc),
            other => Err(Error::UnsupportedConversion(other.to_string())),
        }
    }
}

/// Per-call options; only `pdf_to_docx` consumes the method override.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub method: Option<Method>,
}

impl ConvertOptions {
    pub fn with_method(method: Method) -> Self {
        Self {
            method: Some(method),
        }
    }
}

/// One row of the capability report.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedConversion {
    pub kind: ConversionKind,
    pub description: &'static str,
    pub input_extensions: Vec<&'static str>,
    pub output_extension: &'static str,
}

/// Owns one strategy per conversion kind and dispatches calls.
///
/// Capabilities are probed before construction and fixed for the engine's
/// lifetime; build a new engine to pick up environment changes.
pub struct ConversionEngine {
    capabilities: Capabilities,
    doc_to_pdf: DocToPdfStrategy,
    pdf_to_docx: PdfToDocxStrategy,
    pdf_to_doc: PdfToDocStrategy,
}

impl ConversionEngine {
    /// Build the engine with explicit capabilities.
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            doc_to_pdf: DocToPdfStrategy::new(capabilities.clone()),
            pdf_to_docx: PdfToDocxStrategy::new(capabilities.clone()),
            pdf_to_doc: PdfToDocStrategy::new(capabilities.clone()),
            capabilities,
        }
    }

    /// Build the engine, probing the environment.
    pub fn detect() -> Self {
        Self::new(Capabilities::detect())
    }

    /// The capabilities this engine was built with.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Execute a conversion.
    ///
    /// Errors from the underlying strategy surface to the caller wrapped
    /// with the conversion kind for context.
    pub fn convert(
        &self,
        kind: ConversionKind,
        input: &Path,
        output: &Path,
        options: &ConvertOptions,
    ) -> Result<()> {
        let outcome = match kind {
            ConversionKind::DocToPdf => self.doc_to_pdf.convert(input, output),
            ConversionKind::PdfToDocx => match options.method {
                Some(method) => self.pdf_to_docx.convert_with_method(input, output, method),
                None => self.pdf_to_docx.convert(input, output),
            },
            ConversionKind::PdfToDoc => self.pdf_to_doc.convert(input, output),
        };
        outcome.map_err(|e| Error::in_conversion(kind.name(), e))
    }

    /// Capability report, driven by what was detected at construction.
    pub fn supported_conversions(&self) -> Vec<SupportedConversion> {
        let has_office = self.capabilities.has_office();
        vec![
            SupportedConversion {
                kind: ConversionKind::DocToPdf,
                description: "DOC/DOCX to PDF",
                input_extensions: if has_office {
                    vec!["doc", "docx"]
                } else {
                    vec!["docx"]
                },
                output_extension: "pdf",
            },
            SupportedConversion {
                kind: ConversionKind::PdfToDocx,
                description: "PDF to DOCX",
                input_extensions: vec!["pdf"],
                output_extension: "docx",
            },
            SupportedConversion {
                kind: ConversionKind::PdfToDoc,
                description: "PDF to DOC",
                input_extensions: if has_office { vec!["pdf"] } else { vec![] },
                output_extension: "doc",
            },
        ]
    }
}
