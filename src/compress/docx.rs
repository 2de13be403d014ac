//! DOCX compression by media re-encoding.
//!
//! The package is streamed entry-by-entry into a new archive. Only raster
//! parts under `word/media/` are touched: decoded, bounded to the level's
//! pixel width, and re-encoded in their own format (JPEG at the level's
//! quality). Everything else — document XML, styles, relationships — is
//! copied verbatim, so text content and ordering are preserved exactly.
//! A re-encoded image is kept only when it is actually smaller, and any
//! per-image failure falls back to the original bytes.

use crate::compress::{CompressionStats, Level};
use crate::error::Result;
use crate::files;
use image::{DynamicImage, ImageFormat};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Compress a DOCX file.
pub fn compress_docx(input: &Path, output: &Path, level: Level) -> Result<CompressionStats> {
    files::validate_exists(input)?;
    files::validate_extension(input, &["docx"])?;
    files::validate_non_empty(input)?;

    let mut archive = ZipArchive::new(File::open(input)?)?;
    let mut writer = ZipWriter::new(File::create(output)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    info!("compressing DOCX: {} entries, level={level}", archive.len());

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        if entry.is_dir() {
            writer.add_directory(name, options)?;
            continue;
        }

        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;

        if let Some(format) = media_format(&name) {
            match reencode_media(&data, format, level) {
                Ok(Some(smaller)) => {
                    debug!(
                        "{name}: {} -> {} bytes",
                        data.len(),
                        smaller.len()
                    );
                    data = smaller;
                }
                Ok(None) => debug!("{name}: kept original bytes"),
                Err(e) => warn!("could not re-encode {name}: {e}"),
            }
        }

        writer.start_file(name, options)?;
        writer.write_all(&data)?;
    }

    writer.finish()?;

    let stats = CompressionStats {
        input_bytes: files::file_size(input)?,
        output_bytes: files::file_size(output)?,
    };
    info!(
        "DOCX compressed: {} -> {} bytes (-{:.1}%)",
        stats.input_bytes,
        stats.output_bytes,
        stats.reduction_percent()
    );
    Ok(stats)
}

/// Raster format of a media entry this module can re-encode, if any.
///
/// Vector formats (EMF/WMF) and anything outside `word/media/` pass
/// through untouched.
fn media_format(name: &str) -> Option<ImageFormat> {
    if !name.starts_with("word/media/") {
        return None;
    }
    match name.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => Some(ImageFormat::Jpeg),
        Some("png") => Some(ImageFormat::Png),
        _ => None,
    }
}

/// Re-encode one media part at the level's quality and size bound.
///
/// Returns `Ok(None)` when the result would not be smaller.
fn reencode_media(data: &[u8], format: ImageFormat, level: Level) -> Result<Option<Vec<u8>>> {
    let img = image::load_from_memory_with_format(data, format)?;
    let img = bound_width(img, level.max_image_width());

    let encoded = match format {
        ImageFormat::Jpeg => {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            let mut out = Vec::new();
            let mut encoder = jpeg_encoder::Encoder::new(&mut out, level.jpeg_quality());
            encoder.set_sampling_factor(jpeg_encoder::SamplingFactor::R_4_2_0);
            encoder
                .encode(
                    rgb.as_raw(),
                    width as u16,
                    height as u16,
                    jpeg_encoder::ColorType::Rgb,
                )
                .map_err(|e| crate::error::Error::Image(format!("JPEG encoding failed: {e}")))?;
            out
        }
        _ => {
            let mut out = Vec::new();
            img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
            out
        }
    };

    if encoded.len() < data.len() {
        Ok(Some(encoded))
    } else {
        Ok(None)
    }
}

/// Downscale so the width stays within `max_width`, keeping aspect ratio.
fn bound_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    if img.width() <= max_width {
        return img;
    }
    let height = (u64::from(img.height()) * u64::from(max_width) / u64::from(img.width())).max(1);
    img.resize_exact(max_width, height as u32, image::imageops::FilterType::Triangle)
}
