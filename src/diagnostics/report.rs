//! Diagnostic report types.
//!
//! Recoverable problems found while reading or reconciling annotations are
//! collected here as data rather than written to a process-wide log, so
//! callers can display them, fail on them, or ignore them.

use std::fmt;

/// All diagnostics collected while processing a document.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    /// All issues, in the order they were raised.
    pub issues: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: Diagnostic) {
        log::debug!("{issue}");
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns the issues carrying `code`.
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.issues.iter().filter(move |i| i.code == code)
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "No issues found");
        }

        writeln!(
            f,
            "Completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single recoverable issue.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The severity of the issue.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: DiagnosticCode,

    /// A human-readable description of the issue.
    pub message: String,

    /// Where the issue occurred.
    pub context: DiagnosticContext,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        context: DiagnosticContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    /// Creates a new error.
    pub fn error(
        code: DiagnosticCode,
        message: impl Into<String>,
        context: DiagnosticContext,
    ) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    /// Creates a new warning.
    pub fn warning(
        code: DiagnosticCode,
        message: impl Into<String>,
        context: DiagnosticContext,
    ) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a diagnostic. Neither level aborts processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Input was repaired or dropped; output is still meaningful.
    Warning,
    /// Part of the input could not be represented in the output.
    Error,
}

/// A stable code identifying the type of diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A polygon's last vertex differed from its first; the ring was closed.
    PolygonAutoClosed,
    /// No positive region contains a negative region; it was discarded.
    UnmatchedNegativeRegion,
    /// A ruler, pin or unknown shape was marked negative; it was discarded.
    NegativeRegionWithoutArea,
    /// A region of unknown type was left out of the export.
    UnsupportedShape,
}

/// Where a diagnostic occurred.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticContext {
    /// A region, by its index in the layer as read from the source.
    Region { layer: String, index: usize },
    /// A hole, by its owner's index and its position in the owner's hole list.
    Hole {
        layer: String,
        region: usize,
        hole: usize,
    },
}

impl fmt::Display for DiagnosticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticContext::Region { layer, index } => {
                write!(f, "layer '{}' region {}", layer, index)
            }
            DiagnosticContext::Hole {
                layer,
                region,
                hole,
            } => write!(f, "layer '{}' region {} hole {}", layer, region, hole),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut report = Diagnostics::new();
        assert!(report.is_clean());

        report.add(Diagnostic::warning(
            DiagnosticCode::PolygonAutoClosed,
            "closed",
            DiagnosticContext::Region {
                layer: "Tumor".into(),
                index: 3,
            },
        ));
        report.add(Diagnostic::error(
            DiagnosticCode::UnsupportedShape,
            "skipped",
            DiagnosticContext::Region {
                layer: "Tumor".into(),
                index: 4,
            },
        ));

        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.with_code(DiagnosticCode::PolygonAutoClosed).count(), 1);
    }

    #[test]
    fn display_includes_context() {
        let issue = Diagnostic::warning(
            DiagnosticCode::UnmatchedNegativeRegion,
            "no owner",
            DiagnosticContext::Region {
                layer: "Tumor".into(),
                index: 7,
            },
        );
        assert_eq!(
            issue.to_string(),
            "[WARN ] UnmatchedNegativeRegion in layer 'Tumor' region 7: no owner"
        );
    }
}
