//! Minimal DOCX package writer.
//!
//! Emits just enough OOXML for word processors to open the result: content
//! types, package relationships, the main document part, its relationship
//! file, and any embedded media. Text is unstyled body text.

use crate::docx::{DocxBlock, ImageKind};
use crate::error::Result;
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// EMU (English Metric Units) per inch.
const EMU_PER_INCH: u64 = 914_400;

/// Display width for embedded images: 6.0 inches.
const IMAGE_DISPLAY_WIDTH_EMU: u64 = 6 * EMU_PER_INCH;

/// Accumulates blocks and writes them out as a DOCX package.
#[derive(Debug, Default)]
pub struct DocxBuilder {
    blocks: Vec<DocxBlock>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text paragraph.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.blocks.push(DocxBlock::Paragraph(text.into()));
    }

    /// Append an embedded raster image.
    pub fn add_image(&mut self, data: Vec<u8>, kind: ImageKind, width_px: u32, height_px: u32) {
        self.blocks.push(DocxBlock::Image {
            data,
            kind,
            width_px,
            height_px,
        });
    }

    /// Append an explicit page break.
    pub fn add_page_break(&mut self) {
        self.blocks.push(DocxBlock::PageBreak);
    }

    /// Append an already-built block.
    pub fn add_block(&mut self, block: DocxBlock) {
        self.blocks.push(block);
    }

    /// Number of accumulated blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no blocks have been added yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Write the package to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_package(file)
    }

    /// Write the package into a byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_package(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    fn write_package<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default();

        let images: Vec<&DocxBlock> = self
            .blocks
            .iter()
            .filter(|b| matches!(b, DocxBlock::Image { .. }))
            .collect();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types_xml().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS.as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(self.document_xml().as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(document_rels_xml(&images).as_bytes())?;

        for (index, block) in images.iter().enumerate() {
            if let DocxBlock::Image { data, kind, .. } = block {
                let name = format!("word/media/image{}.{}", index + 1, kind.extension());
                zip.start_file(name, options)?;
                zip.write_all(data)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    fn document_xml(&self) -> String {
        let mut body = String::new();
        let mut image_index = 0usize;

        for block in &self.blocks {
            match block {
                DocxBlock::Paragraph(text) => {
                    body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
                    body.push_str(&xml_escape(text));
                    body.push_str("</w:t></w:r></w:p>");
                }
                DocxBlock::PageBreak => {
                    body.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>");
                }
                DocxBlock::Image {
                    width_px,
                    height_px,
                    ..
                } => {
                    image_index += 1;
                    body.push_str(&image_paragraph_xml(image_index, *width_px, *height_px));
                }
            }
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document \
             xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
             xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\">\
             <w:body>{body}<w:sectPr/></w:body></w:document>"
        )
    }
}

/// Inline drawing paragraph for image `n` (1-based), scaled to the fixed
/// display width with the source aspect ratio preserved.
fn image_paragraph_xml(n: usize, width_px: u32, height_px: u32) -> String {
    let cx = IMAGE_DISPLAY_WIDTH_EMU;
    let cy = if width_px > 0 {
        cx * u64::from(height_px) / u64::from(width_px)
    } else {
        cx
    };
    format!(
        "<w:p><w:r><w:drawing>\
         <wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
         <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
         <wp:docPr id=\"{n}\" name=\"Image{n}\"/>\
         <a:graphic xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
         <a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <pic:pic xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <pic:nvPicPr><pic:cNvPr id=\"{n}\" name=\"Image{n}\"/><pic:cNvPicPr/></pic:nvPicPr>\
         <pic:blipFill><a:blip r:embed=\"rIdImg{n}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
         <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
         </pic:pic></a:graphicData></a:graphic>\
         </wp:inline></w:drawing></w:r></w:p>"
    )
}

fn content_types_xml() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
     <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
     <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
     <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
     <Default Extension=\"png\" ContentType=\"image/png\"/>\
     <Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>\
     <Override PartName=\"/word/document.xml\" \
     ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
     </Types>"
        .to_string()
}

const PACKAGE_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
    <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
    <Relationship Id=\"rId1\" \
    Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
    Target=\"word/document.xml\"/>\
    </Relationships>";

fn document_rels_xml(images: &[&DocxBlock]) -> String {
    let mut rels = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for (index, block) in images.iter().enumerate() {
        if let DocxBlock::Image { kind, .. } = block {
            let n = index + 1;
            rels.push_str(&format!(
                "<Relationship Id=\"rIdImg{n}\" \
                 Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" \
                 Target=\"media/image{n}.{}\"/>",
                kind.extension()
            ));
        }
    }
    rels.push_str("</Relationships>");
    rels
}

/// Escape text content for XML.
fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
