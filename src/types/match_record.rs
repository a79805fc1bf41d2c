use std::fmt;

/// The result of one successful rule evaluation: which rule fired, the status
/// it answers with, and the path it sends the client to (absent for
/// terminal rules such as `410`).
///
/// A resolved redirect chain is a sequence of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct MatchRecord {
    line_number: usize,
    status_code: String,
    target: Option<String>,
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {}",
            self.line_number,
            self.status_code,
            self.target.as_deref().unwrap_or("-")
        )
    }
}

impl MatchRecord {
    pub fn new(
        line_number: usize,
        status_code: impl Into<String>,
        target: Option<impl Into<String>>,
    ) -> Self {
        Self {
            line_number,
            status_code: status_code.into(),
            target: target.map(Into::into),
        }
    }

    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    #[must_use]
    pub fn status_code(&self) -> &str {
        &self.status_code
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Whether this record answers with exactly the given status and target.
    #[must_use]
    pub fn has_outcome(&self, status_code: Option<&str>, target: Option<&str>) -> bool {
        status_code == Some(self.status_code.as_str()) && target == self.target()
    }
}
