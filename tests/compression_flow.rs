//! Compression tests against generated PDF and DOCX inputs.

use docshift::docx::{self, DocxBuilder, ImageKind};
use docshift::pdf::{self, PdfWriter};
use docshift::{compress_file, compress_folder, Level};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// High-entropy JPEG so downscaling has something to gain.
fn noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        pixel.0 = [
            ((x * 13 + y * 7) % 256) as u8,
            ((x * y + 31) % 256) as u8,
            ((x + 5 * y) % 256) as u8,
        ];
    }
    let mut out = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut out, 95);
    encoder
        .encode(
            img.as_raw(),
            width as u16,
            height as u16,
            jpeg_encoder::ColorType::Rgb,
        )
        .unwrap();
    out
}

fn image_docx(dir: &Path, name: &str) -> PathBuf {
    let mut builder = DocxBuilder::new();
    builder.add_paragraph("before the figure");
    builder.add_image(noisy_jpeg(1600, 1200), ImageKind::Jpeg, 1600, 1200);
    builder.add_paragraph("after the figure");
    let path = dir.join(name);
    builder.save(&path).unwrap();
    path
}

fn text_pdf(dir: &Path, name: &str) -> PathBuf {
    let mut writer = PdfWriter::new();
    writer.add_paragraph("compression keeps this line readable");
    let path = dir.join(name);
    writer.save(&path).unwrap();
    path
}

#[test]
fn test_compress_docx_shrinks_and_keeps_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = image_docx(dir.path(), "deck.docx");
    let output = dir.path().join("deck_small.docx");

    let stats = compress_file(&input, &output, Level::High).unwrap();
    assert!(stats.output_bytes > 0);
    assert!(stats.output_bytes < stats.input_bytes);
    assert!(stats.reduction_percent() > 0.0);

    let before = docx::extract_paragraph_text(&input).unwrap();
    let after = docx::extract_paragraph_text(&output).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_compress_pdf_output_stays_readable() {
    let dir = tempfile::tempdir().unwrap();
    let input = text_pdf(dir.path(), "report.pdf");
    let output = dir.path().join("report_small.pdf");

    let stats = compress_file(&input, &output, Level::Medium).unwrap();
    assert!(stats.output_bytes > 0);

    let doc = pdf::validate_pdf(&output).unwrap();
    let lines = pdf::page_text_lines(&doc, 1).unwrap();
    assert!(lines
        .iter()
        .any(|l| l.contains("compression keeps this line readable")));
}

#[test]
fn test_compress_folder_skips_then_forces() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(input_dir.join("nested")).unwrap();

    image_docx(&input_dir, "a.docx");
    text_pdf(&input_dir.join("nested"), "b.pdf");
    // Not a candidate format, must be ignored.
    std::fs::write(input_dir.join("readme.txt"), b"not touched").unwrap();

    let first = compress_folder(&input_dir, &output_dir, Level::Medium, false).unwrap();
    assert_eq!(first.total, 2);
    assert_eq!(first.compressed, 2);
    assert_eq!(first.failed, 0);
    assert!(output_dir.join("compressed_a.docx").exists());
    assert!(output_dir.join("nested/compressed_b.pdf").exists());
    assert!(!output_dir.join("compressed_readme.txt").exists());

    // Second run: outputs already exist, nothing is rewritten.
    let second = compress_folder(&input_dir, &output_dir, Level::Medium, false).unwrap();
    assert_eq!(second.skipped, 2);
    assert_eq!(second.compressed, 0);

    // Force rewrites everything.
    let third = compress_folder(&input_dir, &output_dir, Level::Medium, true).unwrap();
    assert_eq!(third.compressed, 2);
    assert_eq!(third.skipped, 0);
}

#[test]
fn test_compress_folder_counts_corrupt_file_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&input_dir).unwrap();

    image_docx(&input_dir, "good.docx");
    std::fs::write(input_dir.join("broken.pdf"), b"%PDF-garbage").unwrap();

    let report = compress_folder(&input_dir, &output_dir, Level::Low, false).unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.compressed, 1);
    assert_eq!(report.failed, 1);
    assert!(output_dir.join("compressed_good.docx").exists());
}
