//! Diagnostics recorded while building an outline.
//!
//! Two channels are kept apart: warnings about malformed user content
//! (always recoverable) and internal errors, which signal a broken
//! invariant in the input sequence or in this crate. Internal errors fail
//! the build in [`Strictness::Strict`] mode and are only logged otherwise.

use std::fmt;

/// How internal invariant violations are handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strictness {
    /// Internal errors abort the build.
    Strict,
    /// Internal errors are logged and the build degrades gracefully.
    Lenient,
}

impl Default for Strictness {
    /// Strict in debug builds (and tests), lenient in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Diagnostic channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Malformed user content that was corrected.
    Warning,
    /// Invariant violation that should never happen for well-formed input.
    Internal,
}

/// A single diagnostic message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Channel.
    pub kind: DiagnosticKind,
    /// Human-readable message.
    pub message: String,
    /// Source position of the offending call, if known.
    pub position: Option<usize>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} (at {pos})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Error returned by the outline builder.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OutlineError {
    /// Internal invariant violation in strict mode.
    #[error("Internal outline error: {0}")]
    Internal(Diagnostic),
}

/// Collector routing diagnostics to `tracing` and applying [`Strictness`].
#[derive(Debug)]
pub(crate) struct Diagnostics {
    strictness: Strictness,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            items: Vec::new(),
        }
    }

    /// Record a content warning.
    pub(crate) fn warn(&mut self, message: impl Into<String>, position: Option<usize>) {
        let message = message.into();
        tracing::warn!(position = ?position, "{message}");
        self.items.push(Diagnostic {
            kind: DiagnosticKind::Warning,
            message,
            position,
        });
    }

    /// Record an internal error.
    ///
    /// Returns `Err` in strict mode so the caller can abort with `?`.
    pub(crate) fn internal(
        &mut self,
        message: impl Into<String>,
        position: Option<usize>,
    ) -> Result<(), OutlineError> {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::Internal,
            message: message.into(),
            position,
        };
        tracing::error!(position = ?position, "{}", diagnostic.message);
        match self.strictness {
            Strictness::Strict => Err(OutlineError::Internal(diagnostic)),
            Strictness::Lenient => {
                self.items.push(diagnostic);
                Ok(())
            }
        }
    }

    pub(crate) fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_internal_fails() {
        let mut diagnostics = Diagnostics::new(Strictness::Strict);
        let result = diagnostics.internal("broken", Some(3));
        assert!(matches!(
            result,
            Err(OutlineError::Internal(Diagnostic {
                kind: DiagnosticKind::Internal,
                position: Some(3),
                ..
            }))
        ));
    }

    #[test]
    fn test_lenient_internal_is_recorded() {
        let mut diagnostics = Diagnostics::new(Strictness::Lenient);
        diagnostics.internal("broken", None).unwrap();
        diagnostics.warn("clamped", Some(10));

        let items = diagnostics.into_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, DiagnosticKind::Internal);
        assert_eq!(items[1].to_string(), "clamped (at 10)");
    }
}
