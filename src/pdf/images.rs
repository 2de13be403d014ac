//! Embedded raster extraction from PDF pages.
//!
//! Walks a page's `/Resources` → `/XObject` entries and decodes the image
//! streams into portable bytes. Images whose color model or filter is not
//! handled (CMYK and the exotic filters) are skipped rather than failing
//! the page.

use crate::docx::ImageKind;
use crate::error::{Error, Result};
use flate2::read::ZlibDecoder;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use log::{debug, warn};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::{Cursor, Read};

/// A decoded embedded image, ready to re-embed elsewhere.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub data: Vec<u8>,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
}

/// Extract all decodable images referenced by one page, in resource order.
///
/// Per-image decode failures are logged and skipped; an unreadable page
/// resource tree yields an empty list.
pub fn page_images(doc: &Document, page_id: ObjectId) -> Vec<ExtractedImage> {
    let mut extracted = Vec::new();

    let xobjects = match page_xobjects(doc, page_id) {
        Some(dict) => dict,
        None => return extracted,
    };

    for (name, entry) in xobjects.iter() {
        let stream = match resolve(doc, entry) {
            Object::Stream(s) => s,
            _ => continue,
        };
        if !is_image_stream(stream) {
            continue;
        }
        match decode_image_stream(doc, stream) {
            Ok(Some(img)) => extracted.push(img),
            Ok(None) => debug!(
                "skipping image /{} (unsupported color model or filter)",
                String::from_utf8_lossy(name)
            ),
            Err(e) => warn!(
                "failed to decode image /{}: {e}",
                String::from_utf8_lossy(name)
            ),
        }
    }

    extracted
}

/// Whether a stream dictionary declares an Image XObject.
pub fn is_image_stream(stream: &Stream) -> bool {
    matches!(
        stream.dict.get(b"Subtype"),
        Ok(Object::Name(n)) if n == b"Image"
    )
}

fn page_xobjects<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    let page = match doc.get_object(page_id) {
        Ok(Object::Dictionary(d)) => d,
        _ => return None,
    };
    let resources = match page.get(b"Resources") {
        Ok(obj) => match resolve(doc, obj) {
            Object::Dictionary(d) => d,
            _ => return None,
        },
        Err(_) => return None,
    };
    match resources.get(b"XObject") {
        Ok(obj) => match resolve(doc, obj) {
            Object::Dictionary(d) => Some(d),
            _ => None,
        },
        Err(_) => None,
    }
}

/// Follow reference chains to the underlying object.
pub fn resolve<'a>(doc: &'a Document, mut obj: &'a Object) -> &'a Object {
    // Bounded to guard against reference cycles in damaged files.
    for _ in 0..16 {
        match obj {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(inner) => obj = inner,
                Err(_) => break,
            },
            _ => break,
        }
    }
    obj
}

/// First filter name of a stream, resolving `/Filter` arrays to their head.
pub fn first_filter(stream: &Stream) -> Option<String> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(n)) => Some(String::from_utf8_lossy(n).to_string()),
        Ok(Object::Array(arr)) => arr.first().and_then(|f| match f {
            Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
            _ => None,
        }),
        _ => None,
    }
}

fn dict_u32(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    match dict.get(key) {
        Ok(Object::Integer(n)) if *n >= 0 => Some(*n as u32),
        _ => None,
    }
}

/// Color space name, following references and array heads.
pub fn color_space_name(doc: &Document, obj: &Object) -> String {
    match resolve(doc, obj) {
        Object::Name(name) => String::from_utf8_lossy(name).to_string(),
        Object::Array(arr) => match arr.first() {
            Some(Object::Name(name)) => String::from_utf8_lossy(name).to_string(),
            _ => "Unknown".to_string(),
        },
        _ => "Unknown".to_string(),
    }
}

/// Decode one image stream into a [`DynamicImage`].
///
/// Returns `Ok(None)` for unsupported color models (CMYK, indexed) and
/// filters, mirroring the skip behavior of the extraction loop.
pub fn decode_to_dynamic(doc: &Document, stream: &Stream) -> Result<Option<DynamicImage>> {
    let width = dict_u32(&stream.dict, b"Width").unwrap_or(0);
    let height = dict_u32(&stream.dict, b"Height").unwrap_or(0);
    if width == 0 || height == 0 {
        return Ok(None);
    }

    let bits = dict_u32(&stream.dict, b"BitsPerComponent").unwrap_or(8);
    let color_space = stream
        .dict
        .get(b"ColorSpace")
        .map(|cs| color_space_name(doc, cs))
        .unwrap_or_else(|_| "DeviceRGB".to_string());

    let raw = match first_filter(stream).as_deref() {
        Some("DCTDecode") => {
            let img = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)?;
            return Ok(Some(img));
        }
        Some("FlateDecode") => {
            let mut decoder = ZlibDecoder::new(&stream.content[..]);
            let mut decoded = Vec::new();
            decoder.read_to_end(&mut decoded)?;
            decoded
        }
        None => stream.content.clone(),
        Some(_) => return Ok(None),
    };

    if bits != 8 {
        return Ok(None);
    }

    match color_space.as_str() {
        "DeviceRGB" => {
            let expected = (width * height * 3) as usize;
            if raw.len() < expected {
                return Err(Error::Image(format!(
                    "RGB image data truncated: {} of {expected} bytes",
                    raw.len()
                )));
            }
            let img = RgbImage::from_raw(width, height, raw[..expected].to_vec())
                .ok_or_else(|| Error::Image("RGB buffer construction failed".to_string()))?;
            Ok(Some(DynamicImage::ImageRgb8(img)))
        }
        "DeviceGray" => {
            let expected = (width * height) as usize;
            if raw.len() < expected {
                return Err(Error::Image(format!(
                    "grayscale image data truncated: {} of {expected} bytes",
                    raw.len()
                )));
            }
            let img = GrayImage::from_raw(width, height, raw[..expected].to_vec())
                .ok_or_else(|| Error::Image("grayscale buffer construction failed".to_string()))?;
            Ok(Some(DynamicImage::ImageLuma8(img)))
        }
        // Four-component and exotic color models are skipped, not converted.
        _ => Ok(None),
    }
}

fn decode_image_stream(doc: &Document, stream: &Stream) -> Result<Option<ExtractedImage>> {
    // JPEG streams pass through unchanged; everything else re-encodes as PNG.
    if first_filter(stream).as_deref() == Some("DCTDecode") {
        let color_space = stream
            .dict
            .get(b"ColorSpace")
            .map(|cs| color_space_name(doc, cs))
            .unwrap_or_else(|_| "DeviceRGB".to_string());
        if color_space == "DeviceCMYK" {
            return Ok(None);
        }
        let img = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)?;
        return Ok(Some(ExtractedImage {
            data: stream.content.clone(),
            kind: ImageKind::Jpeg,
            width: img.width(),
            height: img.height(),
        }));
    }

    let img = match decode_to_dynamic(doc, stream)? {
        Some(img) => img,
        None => return Ok(None),
    };
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(Some(ExtractedImage {
        data: png,
        kind: ImageKind::Png,
        width: img.width(),
        height: img.height(),
    }))
}
