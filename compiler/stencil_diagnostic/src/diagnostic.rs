use std::fmt;

use stencil_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
///
/// The parser core only emits errors; `Note` exists for callers that
/// attach supplementary context when rendering.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (additional context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic: code, severity, message, and labeled spans.
///
/// Rendering is a caller concern; this type only structures the data.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Create an error diagnostic with the given code.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            labels: Vec::new(),
        }
    }

    /// Set the main message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label.
    #[must_use]
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label.
    #[must_use]
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// The primary label's span, if any label was attached.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|l| l.is_primary)
            .or_else(|| self.labels.first())
            .map(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(span) = self.primary_span() {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stencil_ir::Pos;

    #[test]
    fn test_builder_chain() {
        let span = Span::new(Pos::new(2, 1), Pos::new(2, 4));
        let diag = Diagnostic::error(ErrorCode::E1001)
            .with_message("expected `:`, found `=`")
            .with_label(span, "here");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.primary_span(), Some(span));
        assert_eq!(
            diag.to_string(),
            "error[E1001]: expected `:`, found `=` at 2:1..2:4"
        );
    }

    #[test]
    fn test_primary_span_falls_back_to_first_label() {
        let span = Span::point(Pos::new(1, 1));
        let diag = Diagnostic::error(ErrorCode::E2001)
            .with_secondary_label(span, "previous star parameter");
        assert_eq!(diag.primary_span(), Some(span));
    }
}
