//! PDF compression by embedded-image resampling.
//!
//! Every image XObject is decoded, downscaled by the level's scale
//! factor, and re-encoded as 4:2:0 JPEG at the level's quality. A stream
//! is only replaced when the re-encoded version is smaller. The document
//! is then pruned, renumbered, and saved with deflated streams and
//! object/xref streams.

use crate::compress::{CompressionStats, Level};
use crate::error::{Error, Result};
use crate::files;
use crate::pdf::{self, images};
use image::DynamicImage;
use log::{debug, info, warn};
use lopdf::{dictionary, Object, ObjectId, SaveOptions, Stream};
use std::path::Path;

/// Compress a PDF file.
pub fn compress_pdf(input: &Path, output: &Path, level: Level) -> Result<CompressionStats> {
    files::validate_exists(input)?;
    files::validate_extension(input, &["pdf"])?;
    files::validate_non_empty(input)?;

    let mut doc = pdf::open_document(input)?;

    if pdf::is_encrypted(&doc) {
        warn!("{} reports encryption, attempting soft unlock", input.display());
        pdf::strip_soft_encryption(&mut doc);
    }

    let page_count = doc.get_pages().len();
    info!(
        "compressing PDF: {} page(s), level={level}",
        page_count
    );

    let replaced = resample_images(&mut doc, level);
    debug!("replaced {replaced} image stream(s)");

    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();

    let mut file = std::fs::File::create(output)?;
    let options = SaveOptions::builder()
        .use_object_streams(true)
        .use_xref_streams(true)
        .compression_level(9)
        .build();
    doc.save_with_options(&mut file, options)?;
    drop(file);

    let stats = CompressionStats {
        input_bytes: files::file_size(input)?,
        output_bytes: files::file_size(output)?,
    };
    info!(
        "PDF compressed: {} -> {} bytes (-{:.1}%)",
        stats.input_bytes,
        stats.output_bytes,
        stats.reduction_percent()
    );
    Ok(stats)
}

/// Downscale and re-encode every image XObject in place.
///
/// Returns how many streams were replaced. Undecodable images and images
/// whose re-encoding does not shrink them are left untouched. Soft-mask
/// streams are never re-encoded (the JPEG path would turn their gray
/// samples into RGB), and a replaced image keeps its `/SMask` reference.
fn resample_images(doc: &mut lopdf::Document, level: Level) -> usize {
    let mut image_ids: Vec<ObjectId> = Vec::new();
    let mut mask_ids: Vec<ObjectId> = Vec::new();
    for (id, object) in doc.objects.iter() {
        if let Object::Stream(s) = object {
            if images::is_image_stream(s) {
                image_ids.push(*id);
                if let Ok(Object::Reference(mask)) = s.dict.get(b"SMask") {
                    mask_ids.push(*mask);
                }
            }
        }
    }

    let mut replaced = 0;
    for object_id in image_ids {
        if mask_ids.contains(&object_id) {
            debug!("skipping image {object_id:?}: referenced as a soft mask");
            continue;
        }
        let stream = match doc.get_object(object_id) {
            Ok(Object::Stream(s)) => s.clone(),
            _ => continue,
        };

        let decoded = match images::decode_to_dynamic(doc, &stream) {
            Ok(Some(img)) => img,
            Ok(None) => {
                debug!("skipping image {object_id:?}: unsupported color model or filter");
                continue;
            }
            Err(e) => {
                warn!("skipping image {object_id:?}: {e}");
                continue;
            }
        };

        let scaled = downscale(&decoded, level.image_scale());
        let mut new_stream = match encode_jpeg_stream(&scaled, level.jpeg_quality()) {
            Ok(s) => s,
            Err(e) => {
                warn!("could not re-encode image {object_id:?}: {e}");
                continue;
            }
        };
        if let Ok(smask) = stream.dict.get(b"SMask") {
            new_stream.dict.set("SMask", smask.clone());
        }

        if new_stream.content.len() >= stream.content.len() {
            debug!("keeping original image {object_id:?}: re-encoding did not shrink it");
            continue;
        }

        doc.objects.insert(object_id, Object::Stream(new_stream));
        replaced += 1;
    }
    replaced
}

/// Scale down by `factor`, never below one pixel per axis.
fn downscale(img: &DynamicImage, factor: f32) -> DynamicImage {
    let width = ((img.width() as f32 * factor).round() as u32).max(1);
    let height = ((img.height() as f32 * factor).round() as u32).max(1);
    if width >= img.width() || height >= img.height() {
        return img.clone();
    }
    img.resize_exact(width, height, image::imageops::FilterType::Triangle)
}

/// Encode an image as a DCTDecode (JPEG, 4:2:0) image XObject stream.
fn encode_jpeg_stream(img: &DynamicImage, quality: u8) -> Result<Stream> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg_bytes = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut jpeg_bytes, quality);
    encoder.set_sampling_factor(jpeg_encoder::SamplingFactor::R_4_2_0);
    encoder
        .encode(
            rgb.as_raw(),
            width as u16,
            height as u16,
            jpeg_encoder::ColorType::Rgb,
        )
        .map_err(|e| Error::Image(format!("JPEG encoding failed: {e}")))?;

    let length = jpeg_bytes.len() as i64;
    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
            "Length" => length,
        },
        jpeg_bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use lopdf::content::{Content, Operation};
    use lopdf::Document;

    fn noisy_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            pixel.0 = [
                ((x * 7 + y * 13) % 256) as u8,
                ((x * 3) % 256) as u8,
                ((y * 11) % 256) as u8,
            ];
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_downscale_factors() {
        let img = noisy_image(100, 60);
        let half = downscale(&img, 0.5);
        assert_eq!((half.width(), half.height()), (50, 30));

        let tiny = downscale(&img, 0.001);
        assert_eq!((tiny.width(), tiny.height()), (1, 1));
    }

    #[test]
    fn test_downscale_never_upscales() {
        let img = noisy_image(10, 10);
        let same = downscale(&img, 2.0);
        assert_eq!((same.width(), same.height()), (10, 10));
    }

    #[test]
    fn test_encode_jpeg_stream_shape() {
        let img = noisy_image(64, 32);
        let stream = encode_jpeg_stream(&img, 65).unwrap();
        assert!(images::is_image_stream(&stream));
        assert_eq!(images::first_filter(&stream).as_deref(), Some("DCTDecode"));
        // JPEG SOI marker
        assert_eq!(&stream.content[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_higher_quality_is_larger() {
        let img = noisy_image(128, 128);
        let low = encode_jpeg_stream(&img, 30).unwrap();
        let high = encode_jpeg_stream(&img, 95).unwrap();
        assert!(high.content.len() > low.content.len());
    }

    fn flate_rgb_stream(width: u32, height: u32) -> Stream {
        let img = noisy_image(width, height).to_rgb8();
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, img.as_raw()).unwrap();
        let compressed = encoder.finish().unwrap();
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            compressed,
        )
    }

    #[test]
    fn test_resample_keeps_soft_mask() {
        let mut doc = Document::with_version("1.5");

        let mask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 64_i64,
                "Height" => 64_i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![128u8; 64 * 64],
        );
        let mask_id = doc.add_object(Object::Stream(mask));

        let mut base = flate_rgb_stream(64, 64);
        base.dict.set("SMask", Object::Reference(mask_id));
        let base_id = doc.add_object(Object::Stream(base));

        let replaced = resample_images(&mut doc, Level::High);
        assert_eq!(replaced, 1);

        let stream = match doc.get_object(base_id) {
            Ok(Object::Stream(s)) => s,
            other => panic!("expected the base image stream, got {other:?}"),
        };
        assert_eq!(images::first_filter(stream).as_deref(), Some("DCTDecode"));
        assert!(
            matches!(stream.dict.get(b"SMask"), Ok(Object::Reference(id)) if *id == mask_id)
        );

        // The mask itself keeps its gray samples.
        let mask = match doc.get_object(mask_id) {
            Ok(Object::Stream(s)) => s,
            other => panic!("expected the mask stream, got {other:?}"),
        };
        assert!(images::first_filter(mask).is_none());
    }

    /// One page carrying a single large JPEG XObject.
    fn image_pdf(path: &Path) {
        let stream = encode_jpeg_stream(&noisy_image(600, 400), 95).unwrap();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let image_id = doc.add_object(Object::Stream(stream));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        });

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![300.into(), 0.into(), 0.into(), 200.into(), 50.into(), 400.into()],
                ),
                Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_compress_shrinks_image_heavy_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photos.pdf");
        let output = dir.path().join("photos_small.pdf");
        image_pdf(&input);

        let stats = compress_pdf(&input, &output, Level::High).unwrap();
        assert!(stats.output_bytes > 0);
        assert!(stats.output_bytes < stats.input_bytes);

        let doc = pdf::open_document(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
