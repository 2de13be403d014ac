//! Host capability detection.
//!
//! Capabilities are probed once and then treated as fixed for the lifetime
//! of any engine built from them; picking up an environment change (say,
//! LibreOffice installed mid-process) requires detecting again and building
//! a new engine.

use crate::office::OfficeHost;
use serde::Serialize;
use std::sync::Arc;

/// What the current host environment can do.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    office: Option<Arc<OfficeHost>>,
}

impl Capabilities {
    /// Probe the environment.
    pub fn detect() -> Self {
        Self {
            office: OfficeHost::detect().map(Arc::new),
        }
    }

    /// Capabilities with no external hosts, for built-in-only operation.
    pub fn none() -> Self {
        Self::default()
    }

    /// Capabilities with an explicit office host (used by tests).
    pub fn with_office(host: OfficeHost) -> Self {
        Self {
            office: Some(Arc::new(host)),
        }
    }

    /// The office automation host, if one was detected.
    pub fn office(&self) -> Option<&Arc<OfficeHost>> {
        self.office.as_ref()
    }

    /// Whether an office host is available.
    pub fn has_office(&self) -> bool {
        self.office.is_some()
    }

    /// Serializable snapshot for front-ends.
    pub fn report(&self) -> CapabilityReport {
        CapabilityReport {
            office_host: self.office.as_ref().map(|h| h.program().to_string()),
        }
    }
}

/// Snapshot of detected capabilities, for display or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    /// Name of the detected office binary, if any.
    pub office_host: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_office() {
        let caps = Capabilities::none();
        assert!(!caps.has_office());
        assert!(caps.office().is_none());
        assert!(caps.report().office_host.is_none());
    }

    #[test]
    fn test_detect_is_consistent() {
        let caps = Capabilities::detect();
        assert_eq!(caps.has_office(), caps.report().office_host.is_some());
    }
}
