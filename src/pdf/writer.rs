//! Plain-text PDF generation.
//!
//! Backs the built-in `.docx -> .pdf` path: paragraphs are wrapped into a
//! fixed US-Letter grid and emitted as Helvetica text operations with
//! lopdf. No attempt is made to reproduce source styling.

use crate::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

/// Page geometry: US Letter, 1 inch margins.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;

const FONT_SIZE: i64 = 11;
const LEADING: i64 = 14;

/// Character budget per wrapped line at the fixed font size.
const CHARS_PER_LINE: usize = 85;

/// Lines that fit between the top and bottom margins.
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Accumulates wrapped text lines and writes them out as a PDF.
#[derive(Debug, Default)]
pub struct PdfWriter {
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph, wrapping it to the page's character budget and
    /// flowing onto new pages as needed.
    pub fn add_paragraph(&mut self, text: &str) {
        // Sanitizing first keeps the wrap math byte-accurate.
        let text = sanitize(text);
        for line in wrap_line(&text, CHARS_PER_LINE) {
            if self.current.len() >= LINES_PER_PAGE {
                self.flush_page();
            }
            self.current.push(line);
        }
    }

    /// Start a new page.
    pub fn add_page_break(&mut self) {
        self.flush_page();
    }

    /// Whether anything has been added.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.current.is_empty()
    }

    fn flush_page(&mut self) {
        let lines = std::mem::take(&mut self.current);
        self.pages.push(lines);
    }

    /// Build the lopdf document.
    pub fn to_document(&self) -> Result<Document> {
        let mut pages = self.pages.clone();
        if !self.current.is_empty() || pages.is_empty() {
            pages.push(self.current.clone());
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for lines in &pages {
            let content = page_content(lines);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        Ok(doc)
    }

    /// Write the document to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut doc = self.to_document()?;
        doc.save(path)?;
        Ok(())
    }
}

fn page_content(lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new(
            "Td",
            vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()],
        ),
    ];
    for line in lines {
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.as_str())],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// Restrict text to the printable ASCII subset the base font encoding
/// covers; everything else becomes `?`.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

/// Greedy word wrap with a hard split for words longer than the budget.
fn wrap_line(text: &str, budget: usize) -> Vec<String> {
    let text = text.trim_end();
    if text.len() <= budget {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > budget {
            lines.push(std::mem::take(&mut current));
        }
        if word.len() > budget {
            // Hard-split an overlong token.
            let mut rest = word;
            while rest.len() > budget {
                let (head, tail) = rest.split_at(budget);
                lines.push(head.to_string());
                rest = tail;
            }
            current = rest.to_string();
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files;

    #[test]
    fn test_wrap_short_line_untouched() {
        assert_eq!(wrap_line("hello world", 80), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_respects_budget() {
        let text = "one two three four five six seven eight nine ten";
        for line in wrap_line(text, 12) {
            assert!(line.len() <= 12, "line too long: {line}");
        }
    }

    #[test]
    fn test_wrap_hard_splits_long_token() {
        let token = "x".repeat(30);
        let lines = wrap_line(&token, 10);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.len() <= 10));
    }

    #[test]
    fn test_sanitize_replaces_non_ascii() {
        assert_eq!(sanitize("abc \u{2014} def"), "abc ? def");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[test]
    fn test_empty_writer_still_produces_one_page() {
        let writer = PdfWriter::new();
        let doc = writer.to_document().unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_page_break_creates_pages() {
        let mut writer = PdfWriter::new();
        writer.add_paragraph("page one");
        writer.add_page_break();
        writer.add_paragraph("page two");
        let doc = writer.to_document().unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_saved_file_has_pdf_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let mut writer = PdfWriter::new();
        writer.add_paragraph("signature check");
        writer.save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(files::is_pdf_file(&bytes));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_overflowing_text_flows_to_next_page() {
        let mut writer = PdfWriter::new();
        for i in 0..(LINES_PER_PAGE + 5) {
            writer.add_paragraph(&format!("line {i}"));
        }
        let doc = writer.to_document().unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
