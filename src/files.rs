//! Stateless file validation and path derivation helpers.
//!
//! Every front-end and strategy funnels its input checks through this
//! module so the error messages stay uniform.

use crate::engine::ConversionKind;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// ZIP file magic bytes: PK\x03\x04
pub const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// PDF file magic bytes: %PDF-
pub const PDF_MAGIC: [u8; 5] = [0x25, 0x50, 0x44, 0x46, 0x2D];

/// Check that a path exists and is a regular file.
pub fn validate_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Lowercased extension of a path, without the leading dot.
pub fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Check that a path carries one of the allowed extensions (dot-free,
/// lowercase, e.g. `&["doc", "docx"]`).
pub fn validate_extension(path: &Path, allowed: &[&str]) -> Result<()> {
    let ext = extension(path);
    if allowed.iter().any(|a| *a == ext) {
        return Ok(());
    }
    Err(Error::UnsupportedExtension {
        extension: format!(".{ext}"),
        allowed: allowed
            .iter()
            .map(|a| format!(".{a}"))
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Size of a file in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Check that a file holds at least `min` bytes.
pub fn validate_min_size(path: &Path, min: u64) -> Result<()> {
    if file_size(path)? < min {
        return Err(Error::EmptyFile(path.to_path_buf()));
    }
    Ok(())
}

/// Check that a file is non-empty.
pub fn validate_non_empty(path: &Path) -> Result<()> {
    validate_min_size(path, 1)
}

/// Derive an output path from the input by swapping the suffix for the
/// conversion kind's target extension. The input must exist.
pub fn auto_generate_output_path(input: &Path, kind: ConversionKind) -> Result<PathBuf> {
    validate_exists(input)?;
    Ok(input.with_extension(kind.output_extension()))
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Check if data starts with the PDF header.
pub fn is_pdf_file(data: &[u8]) -> bool {
    data.len() >= 5 && data[..5] == PDF_MAGIC
}

/// Basic descriptive information about a file on disk.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub extension: String,
    pub parent: PathBuf,
}

/// Collect [`FileInfo`] for an existing file.
pub fn file_info(path: &Path) -> Result<FileInfo> {
    validate_exists(path)?;
    Ok(FileInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: file_size(path)?,
        extension: extension(path),
        parent: path.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
    })
}

/// Best-effort file removal. Returns true when the file is gone afterwards.
pub fn safe_delete(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(_) => false,
    }
}
