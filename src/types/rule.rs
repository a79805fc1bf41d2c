use std::fmt;

use fancy_regex::{Captures, Regex};

use super::error::{MatchError, RuleError};
use super::match_record::MatchRecord;

/// Status code implied by `redirect <pattern> <target>`.
pub const DEFAULT_STATUS: &str = "301";

/// Status code of a terminal rule: the page is gone and has no destination.
pub const GONE_STATUS: &str = "410";

/// The directive a rule was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `redirect`: the path must equal the pattern exactly.
    Redirect,
    /// `redirectmatch`: the pattern is a regular expression searched for in the path.
    RedirectMatch,
}

impl RuleKind {
    /// Look up a rule kind from its (case-insensitive) directive token.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownRuleType`] for any other token.
    pub fn from_token(line: usize, token: &str) -> Result<Self, RuleError> {
        match token.to_ascii_lowercase().as_str() {
            "redirect" => Ok(Self::Redirect),
            "redirectmatch" => Ok(Self::RedirectMatch),
            _ => Err(RuleError::UnknownRuleType {
                line,
                kind: token.to_owned(),
            }),
        }
    }
}

/// The positional fields of a rule line after the 3-vs-4 field ambiguity
/// has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleFields<'a> {
    pub(crate) status_code: &'a str,
    pub(crate) pattern: &'a str,
    pub(crate) target: Option<&'a str>,
}

/// Resolve a raw field list (directive token included) into status, pattern
/// and target.
///
/// | fields | shape                              |
/// |--------|------------------------------------|
/// | 4      | `type status pattern target`       |
/// | 3      | `type 410 pattern` (no target)     |
/// | 3      | `type pattern target` (status 301) |
///
/// An empty target token counts as no target.
pub(crate) fn classify<S: AsRef<str>>(
    line: usize,
    fields: &[S],
) -> Result<RuleFields<'_>, RuleError> {
    let fields: Vec<&str> = fields.iter().map(|f| f.as_ref()).collect();
    match *fields.as_slice() {
        [_, status_code, pattern, target] => Ok(RuleFields {
            status_code,
            pattern,
            target: non_empty(target),
        }),
        [_, status_code, pattern] if status_code == GONE_STATUS => Ok(RuleFields {
            status_code,
            pattern,
            target: None,
        }),
        [_, pattern, target] => Ok(RuleFields {
            status_code: DEFAULT_STATUS,
            pattern,
            target: non_empty(target),
        }),
        _ => Err(RuleError::WrongFieldCount {
            line,
            fields: fields.iter().map(|f| (*f).to_owned()).collect(),
        }),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
}

/// A substitution template split into literal text and `$n` group references.
#[derive(Debug, Clone)]
struct Replacement {
    pieces: Vec<Piece>,
    /// Highest `$n` group the template refers to.
    max_group: Option<usize>,
}

impl Replacement {
    /// `$n` takes a single digit, so `$12` is group 1 followed by `2`.
    /// Any other `$` is literal.
    fn new(target: &str) -> Self {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut max_group = None;
        let mut chars = target.chars().peekable();
        while let Some(c) = chars.next() {
            let group = if c == '$' {
                chars.peek().and_then(|d| d.to_digit(10))
            } else {
                None
            };
            let Some(group) = group else {
                literal.push(c);
                continue;
            };
            chars.next();
            let group = group as usize;
            max_group = max_group.max(Some(group));
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Group(group));
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Self { pieces, max_group }
    }

    /// Append the expanded template to `out`. Groups that did not take part
    /// in the match expand to nothing.
    fn expand_into(&self, caps: &Captures<'_>, out: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Group(group) => {
                    if let Some(m) = caps.get(*group) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal,
    Pattern {
        regex: Regex,
        replacement: Option<Replacement>,
    },
}

/// A single redirect directive, identified by the line it was read from.
///
/// Rules are built with [`Rule::new`] (or through
/// [`RuleSet::add`](super::RuleSet::add)) and never change afterwards.
#[derive(Debug, Clone)]
pub struct Rule {
    line_number: usize,
    kind: RuleKind,
    status_code: String,
    pattern: String,
    target: Option<String>,
    matcher: Matcher,
    params: Vec<String>,
}

impl Rule {
    /// Build a rule from its raw fields, directive token first.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the directive is unknown, the field count is
    /// not 3 or 4, or a `redirectmatch` pattern is not a valid regex.
    pub fn new<S: AsRef<str>>(line_number: usize, fields: &[S]) -> Result<Self, RuleError> {
        let Some(token) = fields.first() else {
            return Err(RuleError::WrongFieldCount {
                line: line_number,
                fields: Vec::new(),
            });
        };
        let kind = RuleKind::from_token(line_number, token.as_ref())?;
        let parsed = classify(line_number, fields)?;

        let matcher = match kind {
            RuleKind::Redirect => Matcher::Literal,
            RuleKind::RedirectMatch => {
                let regex =
                    Regex::new(parsed.pattern).map_err(|source| RuleError::InvalidPattern {
                        line: line_number,
                        pattern: parsed.pattern.to_owned(),
                        source,
                    })?;
                Matcher::Pattern {
                    regex,
                    replacement: parsed.target.map(Replacement::new),
                }
            }
        };

        Ok(Self {
            line_number,
            kind,
            status_code: parsed.status_code.to_owned(),
            pattern: parsed.pattern.to_owned(),
            target: parsed.target.map(str::to_owned),
            matcher,
            params: fields.iter().map(|f| f.as_ref().to_owned()).collect(),
        })
    }

    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    #[must_use]
    pub fn status_code(&self) -> &str {
        &self.status_code
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Evaluate this rule against a path.
    ///
    /// Returns `Ok(None)` when the rule does not apply. A `redirectmatch`
    /// rule substitutes the first match of its pattern within `path` using
    /// the target as a template; a rule without a target always yields an
    /// absent result path.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the regex engine gives up on `path` or the
    /// template names a group the pattern does not have.
    pub fn evaluate(&self, path: &str) -> Result<Option<MatchRecord>, MatchError> {
        match &self.matcher {
            Matcher::Literal => {
                if path != self.pattern {
                    return Ok(None);
                }
                Ok(Some(self.record(self.target.clone())))
            }
            Matcher::Pattern { regex, replacement } => {
                let caps = regex
                    .captures(path)
                    .map_err(|e| MatchError::Engine {
                        message: e.to_string(),
                    })?;
                let Some(caps) = caps else {
                    return Ok(None);
                };
                let Some(replacement) = replacement else {
                    return Ok(Some(self.record(None)));
                };
                let groups = regex.captures_len();
                if let Some(group) = replacement.max_group.filter(|&g| g >= groups) {
                    return Err(MatchError::InvalidGroupReference {
                        group,
                        groups: groups - 1,
                    });
                }
                let Some(whole) = caps.get(0) else {
                    return Ok(None);
                };
                let mut new_path = String::with_capacity(path.len());
                new_path.push_str(&path[..whole.start()]);
                replacement.expand_into(&caps, &mut new_path);
                new_path.push_str(&path[whole.end()..]);
                Ok(Some(self.record(Some(new_path))))
            }
        }
    }

    fn record(&self, target: Option<String>) -> MatchRecord {
        MatchRecord::new(self.line_number, self.status_code.clone(), target)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.line_number)?;
        for param in self.params.iter().filter(|p| !p.is_empty()) {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(fields: &[&str]) -> Rule {
        Rule::new(1, fields).unwrap()
    }

    fn eval(rule: &Rule, path: &str) -> Option<(String, Option<String>)> {
        rule.evaluate(path)
            .unwrap()
            .map(|m| (m.status_code().to_owned(), m.target().map(str::to_owned)))
    }

    #[test]
    fn classify_four_fields() {
        let fields = classify(1, &["redirect", "302", "/a", "/b"]).unwrap();
        assert_eq!(
            fields,
            RuleFields {
                status_code: "302",
                pattern: "/a",
                target: Some("/b"),
            }
        );
    }

    #[test]
    fn classify_three_fields_gone() {
        let fields = classify(1, &["redirect", "410", "/a"]).unwrap();
        assert_eq!(fields.status_code, "410");
        assert_eq!(fields.pattern, "/a");
        assert_eq!(fields.target, None);
    }

    #[test]
    fn classify_three_fields_implied_status() {
        let fields = classify(1, &["redirect", "/a", "/b"]).unwrap();
        assert_eq!(fields.status_code, DEFAULT_STATUS);
        assert_eq!(fields.pattern, "/a");
        assert_eq!(fields.target, Some("/b"));
    }

    #[test]
    fn classify_only_gone_is_special() {
        // 404 is not a terminal token; it becomes the pattern.
        let fields = classify(1, &["redirect", "404", "/a"]).unwrap();
        assert_eq!(fields.status_code, DEFAULT_STATUS);
        assert_eq!(fields.pattern, "404");
        assert_eq!(fields.target, Some("/a"));
    }

    #[test]
    fn redirect_match() {
        let r = rule(&["redirect", "301", "/path", "/new/path"]);
        assert_eq!(
            eval(&r, "/path"),
            Some(("301".into(), Some("/new/path".into())))
        );
    }

    #[test]
    fn redirect_no_match() {
        let r = rule(&["redirect", "301", "/path", "/new/path"]);
        assert_eq!(eval(&r, "/different/path"), None);
        assert_eq!(eval(&r, "/path/"), None);
    }

    #[test]
    fn redirect_implied_code() {
        let r = rule(&["redirect", "/the/path", "/new/path"]);
        assert_eq!(r.status_code(), "301");
        assert_eq!(r.kind(), RuleKind::Redirect);
    }

    #[test]
    fn redirect_display() {
        let r = rule(&["redirect", "301", "/path", "/new/path"]);
        assert_eq!(r.to_string(), "[1] redirect 301 /path /new/path");
    }

    #[test]
    fn display_skips_empty_params() {
        let r = rule(&["redirect", "410", "/path", ""]);
        assert_eq!(r.to_string(), "[1] redirect 410 /path");
    }

    #[test]
    fn too_few_fields() {
        let err = Rule::new(1, &["redirect", "/the/path"]).unwrap_err();
        assert!(matches!(err, RuleError::WrongFieldCount { line: 1, .. }));
    }

    #[test]
    fn too_many_fields() {
        let err = Rule::new(
            1,
            &["redirect", "301", "/the/path", "/new/path", "extra-value"],
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::WrongFieldCount { .. }));
    }

    #[test]
    fn no_fields() {
        let err = Rule::new::<&str>(1, &[]).unwrap_err();
        assert!(matches!(err, RuleError::WrongFieldCount { .. }));
    }

    #[test]
    fn unknown_directive() {
        let err = Rule::new(5, &["rewriterule", "/a", "/b"]).unwrap_err();
        assert!(matches!(
            err,
            RuleError::UnknownRuleType { line: 5, ref kind } if kind == "rewriterule"
        ));
    }

    #[test]
    fn directive_is_case_insensitive() {
        assert_eq!(
            rule(&["Redirect", "/a", "/b"]).kind(),
            RuleKind::Redirect
        );
        assert_eq!(
            rule(&["RedirectMatch", "/a", "/b"]).kind(),
            RuleKind::RedirectMatch
        );
    }

    #[test]
    fn redirect_gone_has_absent_target() {
        let r = rule(&["redirect", "410", "/the/path"]);
        assert_eq!(r.status_code(), "410");
        assert_eq!(r.target(), None);
        assert_eq!(eval(&r, "/the/path"), Some(("410".into(), None)));
    }

    #[test]
    fn regex_match() {
        let r = rule(&["redirectmatch", "301", "^/user/.*$", "/pike/user/"]);
        assert_eq!(
            eval(&r, "/user/"),
            Some(("301".into(), Some("/pike/user/".into())))
        );
    }

    #[test]
    fn regex_match_with_group() {
        let r = rule(&["redirectmatch", "301", "^/user/(.*)$", "/pike/user/$1"]);
        assert_eq!(
            eval(&r, "/user/foo"),
            Some(("301".into(), Some("/pike/user/foo".into())))
        );
    }

    #[test]
    fn regex_group_followed_by_text() {
        let r = rule(&["redirectmatch", "^/a/(\\w+)$", "/b/$1suffix"]);
        assert_eq!(
            eval(&r, "/a/xyz"),
            Some(("301".into(), Some("/b/xyzsuffix".into())))
        );
    }

    #[test]
    fn regex_search_is_unanchored() {
        let r = rule(&["redirectmatch", "old", "new"]);
        assert_eq!(
            eval(&r, "/path/old/page"),
            Some(("301".into(), Some("/path/new/page".into())))
        );
    }

    #[test]
    fn regex_replaces_first_match_only() {
        let r = rule(&["redirectmatch", "old", "new"]);
        assert_eq!(
            eval(&r, "/old/old"),
            Some(("301".into(), Some("/new/old".into())))
        );
    }

    #[test]
    fn regex_literal_dollar_in_template() {
        let r = rule(&["redirectmatch", "^/price$", "/cost$x"]);
        assert_eq!(
            eval(&r, "/price"),
            Some(("301".into(), Some("/cost$x".into())))
        );
    }

    #[test]
    fn regex_no_match() {
        let r = rule(&["redirectmatch", "301", "^/user/.*$", "/pike/user/"]);
        assert_eq!(eval(&r, "/different/path"), None);
    }

    #[test]
    fn regex_gone_ignores_groups() {
        let r = rule(&["redirectmatch", "410", "^/(old)/.*$"]);
        assert_eq!(eval(&r, "/old/page"), Some(("410".into(), None)));
    }

    #[test]
    fn regex_display() {
        let r = rule(&["redirectmatch", "301", "^/user/.*$", "/pike/user/"]);
        assert_eq!(r.to_string(), "[1] redirectmatch 301 ^/user/.*$ /pike/user/");
    }

    #[test]
    fn regex_invalid_pattern() {
        let err = Rule::new(9, &["redirectmatch", "301", "^/(unclosed$", "/x"]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { line: 9, .. }));
    }

    #[test]
    fn regex_missing_group_is_a_match_error() {
        let r = rule(&["redirectmatch", "^/a/(.*)$", "/b/$2"]);
        assert_eq!(
            r.evaluate("/a/x"),
            Err(MatchError::InvalidGroupReference {
                group: 2,
                groups: 1,
            })
        );
        // Paths that do not match never reach the substitution.
        assert_eq!(r.evaluate("/elsewhere"), Ok(None));
    }

    #[test]
    fn regex_lookahead() {
        let r = rule(&[
            "redirectmatch",
            "301",
            "^/docs/(?!latest/)(.*)$",
            "/docs/latest/$1",
        ]);
        assert_eq!(
            eval(&r, "/docs/install"),
            Some(("301".into(), Some("/docs/latest/install".into())))
        );
        assert_eq!(eval(&r, "/docs/latest/install"), None);
    }

    #[test]
    fn regex_lookbehind() {
        let r = rule(&["redirectmatch", "(?<=/blog)/old$", "/new"]);
        assert_eq!(
            eval(&r, "/blog/old"),
            Some(("301".into(), Some("/blog/new".into())))
        );
        assert_eq!(eval(&r, "/news/old"), None);
    }

    #[test]
    fn regex_unmatched_group_expands_empty() {
        let r = rule(&["redirectmatch", "^/a(/x)?/(.*)$", "/b$1/$2"]);
        assert_eq!(
            eval(&r, "/a/page"),
            Some(("301".into(), Some("/b/page".into())))
        );
    }

    #[test]
    fn regex_backtrack_limit_is_a_match_error() {
        let r = rule(&["redirectmatch", "410", "(?i)(a|b|ab)*(?=c)"]);
        let path = format!("/{}", "ab".repeat(40));
        assert!(matches!(r.evaluate(&path), Err(MatchError::Engine { .. })));
    }

    #[test]
    fn replacement_translation() {
        let r = Replacement::new("/x/$1/$2$");
        assert_eq!(
            r.pieces,
            [
                Piece::Literal("/x/".into()),
                Piece::Group(1),
                Piece::Literal("/".into()),
                Piece::Group(2),
                Piece::Literal("$".into()),
            ]
        );
        assert_eq!(r.max_group, Some(2));
        assert_eq!(Replacement::new("/plain").max_group, None);
        assert_eq!(Replacement::new("$12").pieces, [Piece::Group(1), Piece::Literal("2".into())]);
    }
}
