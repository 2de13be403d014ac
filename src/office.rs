//! External word-processor automation host.
//!
//! Format-faithful conversions that need a real word processor (legacy
//! `.doc` in either direction, one-pass PDF import) are delegated to a
//! headless LibreOffice process. Each call launches the host, runs a
//! single conversion, and tears it down; nothing is pooled or reused.
//! No timeout is enforced, so a hung host blocks the calling thread.

use crate::error::{Error, Result};
use crate::files;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Candidate binary names probed during detection, in order.
const HOST_CANDIDATES: &[&str] = &["soffice", "libreoffice"];

/// Handle to a detected office installation.
///
/// The live check runs once per process and is cached; later calls reuse
/// the recorded outcome instead of probing the host again.
#[derive(Debug)]
pub struct OfficeHost {
    program: String,
    verified: OnceLock<bool>,
}

impl OfficeHost {
    /// Probe the environment for an office installation.
    ///
    /// Returns `None` when no candidate binary answers a version query.
    pub fn detect() -> Option<Self> {
        for candidate in HOST_CANDIDATES {
            let probe = Command::new(candidate).arg("--version").output();
            if let Ok(out) = probe {
                if out.status.success() {
                    debug!(
                        "office host detected: {} ({})",
                        candidate,
                        String::from_utf8_lossy(&out.stdout).trim()
                    );
                    return Some(Self {
                        program: candidate.to_string(),
                        verified: OnceLock::new(),
                    });
                }
            }
        }
        None
    }

    /// Host wrapping an explicit program, bypassing detection.
    ///
    /// The program still goes through the one-time live verification on
    /// first use.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            verified: OnceLock::new(),
        }
    }

    /// Name of the underlying binary.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// One-time live verification of the host.
    ///
    /// Detection at construction can go stale; the first conversion that
    /// actually needs the host re-checks it and caches the result.
    pub fn verify(&self) -> Result<()> {
        let ok = *self.verified.get_or_init(|| {
            Command::new(&self.program)
                .arg("--version")
                .output()
                .map(|out| out.status.success())
                .unwrap_or(false)
        });
        if ok {
            Ok(())
        } else {
            Err(Error::MissingDependency(format!(
                "office host `{}` did not respond; make sure LibreOffice is installed and on PATH",
                self.program
            )))
        }
    }

    /// Convert `input` into the format implied by `output`'s extension.
    ///
    /// The host writes `<stem>.<ext>` into a directory of its own choosing,
    /// so the conversion runs inside a private temp dir and the produced
    /// file is then moved to the requested output path. The temp dir is
    /// removed on every exit path.
    pub fn save_as(&self, input: &Path, output: &Path) -> Result<()> {
        self.verify()?;

        let target_ext = files::extension(output);
        if target_ext.is_empty() {
            return Err(Error::InvalidOutput(format!(
                "output path has no extension: {}",
                output.display()
            )));
        }

        let input = input.canonicalize()?;
        let workdir = tempfile::tempdir()?;

        info!(
            "office host: converting {} -> .{}",
            input.display(),
            target_ext
        );

        let run = Command::new(&self.program)
            .args([
                "--headless",
                "--norestore",
                "--convert-to",
                &target_ext,
                "--outdir",
            ])
            .arg(workdir.path())
            .arg(&input)
            .output()
            .map_err(|e| Error::OfficeHost(format!("failed to launch {}: {e}", self.program)))?;

        if !run.status.success() {
            return Err(Error::OfficeHost(format!(
                "{} exited with {:?}: {}",
                self.program,
                run.status.code(),
                String::from_utf8_lossy(&run.stderr).trim()
            )));
        }

        let produced = self.locate_produced(workdir.path(), &input, &target_ext)?;
        move_file(&produced, output)?;

        files::validate_non_empty(output).map_err(|_| {
            Error::InvalidOutput(format!(
                "office host produced an empty file for {}",
                output.display()
            ))
        })?;
        Ok(())
    }

    /// Find the file the host wrote into the work dir.
    fn locate_produced(&self, workdir: &Path, input: &Path, ext: &str) -> Result<PathBuf> {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let expected = workdir.join(format!("{stem}.{ext}"));
        if expected.is_file() {
            return Ok(expected);
        }
        // Some host versions mangle the stem; fall back to the only file
        // with the right extension.
        let mut matches: Vec<PathBuf> = std::fs::read_dir(workdir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| files::extension(p) == ext)
            .collect();
        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(Error::OfficeHost(format!(
                "{} reported success but produced no .{ext} file",
                self.program
            ))),
            _ => Err(Error::OfficeHost(format!(
                "{} produced multiple .{ext} files, cannot pick one",
                self.program
            ))),
        }
    }
}

/// Move a file across the filesystem, tolerating cross-device temp dirs.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    if !files::safe_delete(from) {
        warn!("could not remove intermediate file {}", from.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_does_not_panic() {
        // Environment-dependent: the host may or may not be installed.
        let _ = OfficeHost::detect();
    }

    #[test]
    fn test_verify_failure_for_bogus_program() {
        let host = OfficeHost::with_program("definitely-not-an-office-host");
        let err = host.verify().unwrap_err();
        assert!(matches!(err, Error::MissingDependency(_)));
        // Cached: second call fails the same way without re-probing.
        assert!(host.verify().is_err());
    }

    #[test]
    fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.docx");
        let to = dir.path().join("b.docx");
        std::fs::write(&from, b"payload").unwrap();
        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"payload");
    }
}
