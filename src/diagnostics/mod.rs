//! Diagnostics reported during a generation pass.
//!
//! Warnings describe conflicts the generator resolved on its own; errors
//! mark a single provider that could not be generated. Neither stops the
//! pass. Each reported diagnostic is also mirrored to `tracing`.

use colored::Colorize;
use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// One diagnostic message, optionally tied to a source element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub element: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, element: Option<&str>) -> Self {
        Self {
            severity,
            message: message.into(),
            element: element.map(str::to_string),
        }
    }

    /// Render for a terminal, coloured by severity.
    pub fn colored(&self) -> String {
        let label = match self.severity {
            Severity::Note => "note".cyan().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Error => "error".red().bold(),
        };
        match &self.element {
            Some(element) => format!("{label}: {}\n  --> {}", self.message, element.dimmed()),
            None => format!("{label}: {}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(element) = &self.element {
            write!(f, " ({element})")?;
        }
        Ok(())
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn note(&mut self, message: &str, element: Option<&str>) {
        self.report(Diagnostic::new(Severity::Note, message, element));
    }

    fn warning(&mut self, message: &str, element: Option<&str>) {
        self.report(Diagnostic::new(Severity::Warning, message, element));
    }

    fn error(&mut self, message: &str, element: Option<&str>) {
        self.report(Diagnostic::new(Severity::Error, message, element));
    }
}

/// Collects diagnostics in report order.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        let element = diagnostic.element.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Note => info!(element, "{}", diagnostic.message),
            Severity::Warning => warn!(element, "{}", diagnostic.message),
            Severity::Error => error!(element, "{}", diagnostic.message),
        }
        self.entries.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning("first", Some("a.B.c"));
        diagnostics.error("second", None);
        diagnostics.note("third", None);

        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(diagnostics.count(Severity::Warning), 1);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(Severity::Warning, "conflict", Some("field a.B.c"));
        assert_eq!(diagnostic.to_string(), "warning: conflict (field a.B.c)");
        assert_eq!(Diagnostic::new(Severity::Error, "boom", None).to_string(), "error: boom");
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
