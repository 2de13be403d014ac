//! Document size compression.
//!
//! Independent of the conversion engine: a PDF or DOCX goes in, a smaller
//! file of the same format comes out. The level tables use one uniform
//! semantic across both formats: a higher level means a smaller output at
//! a lower quality.

mod docx;
mod pdf;

pub use self::docx::compress_docx;
pub use self::pdf::compress_pdf;

use crate::error::{Error, Result};
use crate::files;
use log::{info, warn};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Named compression tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    /// Scale factor applied to embedded PDF image dimensions.
    pub fn image_scale(&self) -> f32 {
        match self {
            Level::Low => 0.5,
            Level::Medium => 0.3,
            Level::High => 0.1,
        }
    }

    /// JPEG re-encode quality (uniform for PDF and DOCX paths).
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            Level::Low => 85,
            Level::Medium => 65,
            Level::High => 45,
        }
    }

    /// Pixel-width bound for re-encoded DOCX media.
    pub fn max_image_width(&self) -> u32 {
        match self {
            Level::Low => 2000,
            Level::Medium => 1600,
            Level::High => 1200,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            other => Err(Error::UnsupportedConversion(format!(
                "unknown compression level: {other}"
            ))),
        }
    }
}

/// Byte sizes before and after one compression run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompressionStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl CompressionStats {
    /// Size reduction in percent; negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.output_bytes as f64 / self.input_bytes as f64)
    }
}

/// Compress a single file, dispatching on its extension.
///
/// Anything other than `.pdf` or `.docx` fails immediately without
/// creating an output file.
pub fn compress(input: &Path, output: &Path, level: Level) -> Result<CompressionStats> {
    match files::extension(input).as_str() {
        "pdf" => compress_pdf(input, output, level),
        "docx" => compress_docx(input, output, level),
        other => Err(Error::UnsupportedExtension {
            extension: format!(".{other}"),
            allowed: ".pdf, .docx".to_string(),
        }),
    }
}

/// Outcome counters of a folder compression run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub compressed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

/// Compress every `.pdf`/`.docx` under `input_dir` into `output_dir`.
///
/// Outputs are named `compressed_<name>` and mirror the relative directory
/// structure. Existing outputs are skipped (reported, not failed) unless
/// `force` is set. Per-file failures are logged and counted; the batch
/// always runs to the end.
pub fn compress_folder(
    input_dir: &Path,
    output_dir: &Path,
    level: Level,
    force: bool,
) -> Result<BatchReport> {
    if !input_dir.is_dir() {
        return Err(Error::InputNotFound(input_dir.to_path_buf()));
    }
    std::fs::create_dir_all(output_dir)?;

    let mut candidates = Vec::new();
    collect_candidates(input_dir, &mut candidates)?;
    candidates.sort();

    let mut report = BatchReport {
        total: candidates.len(),
        ..Default::default()
    };

    for path in &candidates {
        let relative = path.strip_prefix(input_dir).unwrap_or(path);
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let out = match relative.parent() {
            Some(parent) if parent != Path::new("") => {
                output_dir.join(parent).join(format!("compressed_{file_name}"))
            }
            _ => output_dir.join(format!("compressed_{file_name}")),
        };
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !force && out.exists() {
            info!("skipping existing output {}", out.display());
            report.skipped += 1;
            continue;
        }

        match compress(path, &out, level) {
            Ok(stats) => {
                info!(
                    "{} -> {} (-{:.1}%)",
                    relative.display(),
                    out.display(),
                    stats.reduction_percent()
                );
                report.compressed += 1;
            }
            Err(e) => {
                warn!("failed to compress {}: {e}", path.display());
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

fn collect_candidates(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_candidates(&path, out)?;
        } else if matches!(files::extension(&path).as_str(), "pdf" | "docx") {
            out.push(path);
        }
    }
    Ok(())
}
