//! Non-fatal warnings raised while building inputs or computing visibility.
//!
//! A [`Diagnostics`] handle is created per run and passed explicitly to the
//! constructors and the engine. Every entry is also forwarded to `tracing`,
//! so callers that only watch the log still see them.

use parking_lot::Mutex;
use serde::Serialize;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A resolution requirement pair with `min >= max`; the camera gets an
    /// empty or inverted depth of field.
    InvertedResolutionRange,
    /// A ray-march step coarse enough to skip over single-voxel obstacles.
    CoarseSampleStep,
}

impl DiagnosticKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            DiagnosticKind::InvertedResolutionRange => "Inverted resolution range",
            DiagnosticKind::CoarseSampleStep => "Coarse sample step",
        }
    }
}

/// A single recorded warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Thread-safe collector for the warnings of one run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = kind.display_name(), "{}", message);
        self.entries.lock().push(Diagnostic { kind, message });
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drain all entries, leaving the collector empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_records_entries() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.warn(DiagnosticKind::CoarseSampleStep, "step 0.8");
        diagnostics.warn(DiagnosticKind::InvertedResolutionRange, "camera 3");
        diagnostics.warn(DiagnosticKind::InvertedResolutionRange, "camera 4");

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.count(DiagnosticKind::InvertedResolutionRange), 2);
        assert_eq!(diagnostics.entries()[0].message, "step 0.8");
    }

    #[test]
    fn test_take_empties_collector() {
        let diagnostics = Diagnostics::new();
        diagnostics.warn(DiagnosticKind::CoarseSampleStep, "step 0.6");

        let taken = diagnostics.take();
        assert_eq!(taken.len(), 1);
        assert!(diagnostics.is_empty());
    }
}
