use thiserror::Error;

/// Errors raised while building a rule from its raw fields.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("could not understand rule on line {line}: expected 3 or 4 fields, got {}", fields.len())]
    WrongFieldCount { line: usize, fields: Vec<String> },

    #[error("unknown rule type '{kind}' on line {line}")]
    UnknownRuleType { line: usize, kind: String },

    #[error("invalid pattern '{pattern}' on line {line}: {source}")]
    InvalidPattern {
        line: usize,
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },
}

/// Errors raised while reading a test case line.
#[derive(Debug, Error)]
pub enum TestCaseError {
    #[error("wrong number of arguments in test on line {line}: {}", fields.join(" "))]
    WrongFieldCount { line: usize, fields: Vec<String> },
}

/// A fault raised while evaluating a single rule against a path.
///
/// These never abort a run: the [`RuleSet`](super::RuleSet) reports them to
/// its diagnostic sink and treats the rule as non-matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("template refers to group {group} but the pattern has only {groups} group(s)")]
    InvalidGroupReference { group: usize, groups: usize },

    #[error("regex engine failed: {message}")]
    Engine { message: String },
}
