use std::collections::HashMap;
use std::fmt;

use super::diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
use super::error::RuleError;
use super::match_record::MatchRecord;
use super::rule::Rule;

/// An ordered collection of redirect rules, evaluated first-match-wins.
///
/// Rules keep the order they were added in. A lookup table from line number
/// to rule sits alongside; adding a second rule with the same line number
/// replaces the lookup entry but both rules stay in the evaluation order.
///
/// Once loaded the set is only read, so it can be shared across threads.
///
/// # Example
///
/// ```
/// use redirect_audit::RuleSet;
///
/// let mut ruleset = RuleSet::new();
/// ruleset.add(1, &["redirect", "301", "/old", "/new"]).unwrap();
/// ruleset.add(2, &["redirectmatch", "^/user/(.*)$", "/people/$1"]).unwrap();
///
/// let hit = ruleset.match_path("/user/ada").unwrap();
/// assert_eq!(hit.line_number(), 2);
/// assert_eq!(hit.target(), Some("/people/ada"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    by_line: HashMap<usize, usize>,
    ids: Vec<usize>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule from its raw fields and append it.
    ///
    /// The first field picks the rule kind (`redirect` or `redirectmatch`,
    /// case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the rule cannot be built. The set is left
    /// unchanged.
    pub fn add<S: AsRef<str>>(
        &mut self,
        line_number: usize,
        fields: &[S],
    ) -> Result<(), RuleError> {
        let rule = Rule::new(line_number, fields)?;
        self.push(rule);
        Ok(())
    }

    /// Append an already built rule.
    pub fn push(&mut self, rule: Rule) {
        let line_number = rule.line_number();
        self.rules.push(rule);
        if self
            .by_line
            .insert(line_number, self.rules.len() - 1)
            .is_none()
        {
            self.ids.push(line_number);
        }
    }

    /// Look up the rule registered for a line number.
    #[must_use]
    pub fn get(&self, line_number: usize) -> Option<&Rule> {
        self.by_line.get(&line_number).map(|&idx| &self.rules[idx])
    }

    /// Iterate rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every line number ever added, in insertion order and without repeats.
    #[must_use]
    pub fn all_ids(&self) -> &[usize] {
        &self.ids
    }

    /// Find the first rule, in insertion order, that matches `path`.
    ///
    /// A rule whose evaluation fails is reported to `sink` and skipped; it
    /// never wins the match. Returns `None` if no rule matches.
    pub fn find_match(&self, path: &str, sink: &mut impl DiagnosticSink) -> Option<MatchRecord> {
        for rule in &self.rules {
            match rule.evaluate(path) {
                Ok(Some(record)) => {
                    tracing::debug!(%rule, path, %record, "matched");
                    return Some(record);
                }
                Ok(None) => {}
                Err(error) => sink.warn(Diagnostic {
                    line_number: rule.line_number(),
                    rule: rule.to_string(),
                    path: path.to_owned(),
                    error,
                }),
            }
        }
        None
    }

    /// [`find_match`](Self::find_match) with faults logged through `tracing`.
    pub fn match_path(&self, path: &str) -> Option<MatchRecord> {
        self.find_match(path, &mut TracingSink)
    }

    /// Parse rule-file text and build a `RuleSet` from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on a tokenizer failure or the first
    /// rule that cannot be built.
    pub fn from_rules(input: &str) -> Result<Self, crate::Error> {
        let mut ruleset = Self::new();
        for line in crate::parse::parse_rules(input)? {
            ruleset.add(line.line_number, &line.fields)?;
        }
        tracing::debug!(rules = ruleset.len(), "loaded rules");
        Ok(ruleset)
    }

    /// Read a rule file and build a `RuleSet` from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on I/O, parse, or rule failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::Error> {
        let input = std::fs::read_to_string(path)?;
        Self::from_rules(&input)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSet({} rules, {} line numbers)",
            self.rules.len(),
            self.ids.len(),
        )
    }
}
