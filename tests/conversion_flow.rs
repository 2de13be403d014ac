//! End-to-end conversion tests against generated documents.
//!
//! Everything runs on the built-in paths (no office host is assumed in the
//! test environment), so the engine is always constructed with explicit
//! capabilities.

use docshift::docx::{self, DocxBlock, DocxBuilder};
use docshift::{
    Capabilities, ConversionEngine, ConversionKind, ConvertOptions, Error, Method,
};
use std::path::{Path, PathBuf};

fn engine_without_office() -> ConversionEngine {
    ConversionEngine::new(Capabilities::none())
}

fn build_docx(dir: &Path, paragraphs: &[&str]) -> PathBuf {
    let mut builder = DocxBuilder::new();
    for text in paragraphs {
        builder.add_paragraph(*text);
    }
    let path = dir.join("input.docx");
    builder.save(&path).unwrap();
    path
}

#[test]
fn test_docx_to_pdf_to_docx_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let docx_in = build_docx(dir.path(), &["first paragraph", "second paragraph"]);
    let pdf = dir.path().join("middle.pdf");
    let docx_out = dir.path().join("output.docx");

    let engine = engine_without_office();
    engine
        .convert(
            ConversionKind::DocToPdf,
            &docx_in,
            &pdf,
            &ConvertOptions::default(),
        )
        .unwrap();
    assert!(pdf.exists());

    engine
        .convert(
            ConversionKind::PdfToDocx,
            &pdf,
            &docx_out,
            &ConvertOptions::with_method(Method::TextOnly),
        )
        .unwrap();

    let text = docx::extract_paragraph_text(&docx_out).unwrap().join(" ");
    assert!(text.contains("first paragraph"));
    assert!(text.contains("second paragraph"));
}

#[test]
fn test_page_breaks_survive_the_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = DocxBuilder::new();
    builder.add_paragraph("page one");
    builder.add_page_break();
    builder.add_paragraph("page two");
    let docx_in = dir.path().join("paged.docx");
    builder.save(&docx_in).unwrap();

    let pdf = dir.path().join("paged.pdf");
    let docx_out = dir.path().join("paged_back.docx");

    let engine = engine_without_office();
    engine
        .convert(
            ConversionKind::DocToPdf,
            &docx_in,
            &pdf,
            &ConvertOptions::default(),
        )
        .unwrap();

    engine
        .convert(
            ConversionKind::PdfToDocx,
            &pdf,
            &docx_out,
            &ConvertOptions::with_method(Method::TextOnly),
        )
        .unwrap();

    let blocks = docx::read_blocks(&docx_out).unwrap();
    let breaks = blocks
        .iter()
        .filter(|b| matches!(b, DocxBlock::PageBreak))
        .count();
    assert_eq!(breaks, 1);
}

#[test]
fn test_auto_method_falls_back_without_office() {
    let dir = tempfile::tempdir().unwrap();
    let docx_in = build_docx(dir.path(), &["fallback body"]);
    let pdf = dir.path().join("doc.pdf");
    let docx_out = dir.path().join("doc_back.docx");

    let engine = engine_without_office();
    engine
        .convert(
            ConversionKind::DocToPdf,
            &docx_in,
            &pdf,
            &ConvertOptions::default(),
        )
        .unwrap();

    // No method override: the chain skips the unavailable office path and
    // lands on a built-in one.
    engine
        .convert(
            ConversionKind::PdfToDocx,
            &pdf,
            &docx_out,
            &ConvertOptions::default(),
        )
        .unwrap();
    assert!(docx_out.exists());
    let text = docx::extract_paragraph_text(&docx_out).unwrap().join(" ");
    assert!(text.contains("fallback body"));
}

#[test]
fn test_pdf_to_doc_fails_cleanly_without_office() {
    let dir = tempfile::tempdir().unwrap();
    let docx_in = build_docx(dir.path(), &["body"]);
    let pdf = dir.path().join("doc.pdf");
    let doc_out = dir.path().join("legacy.doc");

    let engine = engine_without_office();
    engine
        .convert(
            ConversionKind::DocToPdf,
            &docx_in,
            &pdf,
            &ConvertOptions::default(),
        )
        .unwrap();

    let err = engine
        .convert(
            ConversionKind::PdfToDoc,
            &pdf,
            &doc_out,
            &ConvertOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::ConversionFailed { .. }));
    assert!(err.to_string().contains("pdf_to_doc"));
    assert!(!doc_out.exists());
}

#[test]
fn test_wrong_input_extension_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, b"plain text").unwrap();
    let output = dir.path().join("notes.pdf");

    let engine = engine_without_office();
    let err = engine
        .convert(
            ConversionKind::DocToPdf,
            &input,
            &output,
            &ConvertOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::ConversionFailed { .. }));
    assert!(!output.exists());
}

#[test]
fn test_convenience_function_matches_engine_path() {
    let dir = tempfile::tempdir().unwrap();
    let docx_in = build_docx(dir.path(), &["quick path"]);
    let pdf = dir.path().join("quick.pdf");

    docshift::convert_file(ConversionKind::DocToPdf, &docx_in, &pdf).unwrap();
    assert!(pdf.exists());

    let doc = docshift::pdf::validate_pdf(&pdf).unwrap();
    let lines = docshift::pdf::page_text_lines(&doc, 1).unwrap();
    assert!(lines.iter().any(|l| l.contains("quick path")));
}
