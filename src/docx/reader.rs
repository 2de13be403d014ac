//! Streaming DOCX reader.
//!
//! Walks `word/document.xml` with quick-xml and yields the flat block list
//! the conversion paths consume. Run properties, tables, and numbering are
//! ignored; only paragraph text and explicit page breaks survive.

use crate::docx::DocxBlock;
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read the flat block list from a DOCX file.
pub fn read_blocks(path: &Path) -> Result<Vec<DocxBlock>> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let xml = read_document_xml(&mut archive)?;
    parse_document_xml(&xml)
}

/// Extract all paragraph text, one string per paragraph, in order.
pub fn extract_paragraph_text(path: &Path) -> Result<Vec<String>> {
    Ok(read_blocks(path)?
        .into_iter()
        .filter_map(|b| match b {
            DocxBlock::Paragraph(text) => Some(text),
            _ => None,
        })
        .collect())
}

fn read_document_xml<R: Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>) -> Result<String> {
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|_| Error::XmlParse("word/document.xml not found in package".to_string()))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Parse the main document part into blocks.
fn parse_document_xml(xml: &str) -> Result<Vec<DocxBlock>> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();

    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(Error::from)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => paragraph = Some(String::new()),
                b"w:t" => in_text = true,
                b"w:br" => {
                    if is_page_break(&e)? {
                        flush_paragraph(&mut paragraph, &mut blocks);
                        blocks.push(DocxBlock::PageBreak);
                        paragraph = Some(String::new());
                    }
                }
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"w:br" && is_page_break(&e)? {
                    flush_paragraph(&mut paragraph, &mut blocks);
                    blocks.push(DocxBlock::PageBreak);
                    paragraph = Some(String::new());
                }
            }
            Event::Text(t) => {
                if in_text {
                    if let Some(ref mut p) = paragraph {
                        p.push_str(&t.unescape().map_err(Error::from)?);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => flush_paragraph(&mut paragraph, &mut blocks),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(blocks)
}

fn is_page_break(e: &quick_xml::events::BytesStart<'_>) -> Result<bool> {
    let attr = e
        .try_get_attribute("w:type")
        .map_err(|err| Error::XmlParse(err.to_string()))?;
    match attr {
        Some(a) => {
            let value = a
                .unescape_value()
                .map_err(|err| Error::XmlParse(err.to_string()))?;
            Ok(value == "page")
        }
        None => Ok(false),
    }
}

fn flush_paragraph(paragraph: &mut Option<String>, blocks: &mut Vec<DocxBlock>) {
    if let Some(text) = paragraph.take() {
        if !text.trim().is_empty() {
            blocks.push(DocxBlock::Paragraph(text));
        }
    }
}
