use std::fmt;

use super::error::MatchError;

/// A rule that could not be evaluated against a path and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line_number: usize,
    pub rule: String,
    pub path: String,
    pub error: MatchError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to evaluate {} against {}: {}",
            self.rule, self.path, self.error
        )
    }
}

/// Receives warnings produced while matching paths against a
/// [`RuleSet`](super::RuleSet).
///
/// Matching never fails because of a single faulty rule; the fault is handed
/// to the sink and evaluation moves on to the next rule.
pub trait DiagnosticSink {
    fn warn(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics for later inspection.
impl DiagnosticSink for Vec<Diagnostic> {
    fn warn(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing` at `WARN` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            line = diagnostic.line_number,
            path = %diagnostic.path,
            "{diagnostic}"
        );
    }
}
