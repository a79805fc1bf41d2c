mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::ParsedLine;

use crate::TestCase;

/// Split rule-file text into numbered field lists.
///
/// Line numbers are 1-based physical lines. Blank lines and lines whose first
/// non-blank character is `#` are skipped. Words are split shell-style:
/// quoted text stays together and loses its quotes.
///
/// # Errors
///
/// Returns [`ParseError`] for the first line that cannot be tokenized
/// (an unterminated quote or a trailing backslash).
pub fn parse_rules(input: &str) -> Result<Vec<ParsedLine>, ParseError> {
    use winnow::Parser;
    input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_matches(grammar::is_blank)))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)| {
            grammar::fields
                .parse(line)
                .map(|fields| ParsedLine {
                    line_number,
                    fields,
                })
                .map_err(|e| ParseError::new(line_number, e.to_string()))
        })
        .collect()
}

/// Split test-file text into [`TestCase`]s.
///
/// Uses the same line handling as [`parse_rules`]. Each line is
/// `<path> <status> [<target>]`; missing trailing fields are absent.
///
/// # Errors
///
/// Returns [`Error`](crate::Error) if a line cannot be tokenized or has more
/// than three fields.
pub fn parse_tests(input: &str) -> Result<Vec<TestCase>, crate::Error> {
    let tests = parse_rules(input)?
        .into_iter()
        .map(|line| TestCase::from_fields(line.line_number, &line.fields))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(tests = tests.len(), "loaded tests");
    Ok(tests)
}

/// Read a test file and parse it with [`parse_tests`].
///
/// # Errors
///
/// Returns [`Error`](crate::Error) on I/O or parse failure.
pub fn load_tests_file(path: impl AsRef<std::path::Path>) -> Result<Vec<TestCase>, crate::Error> {
    let input = std::fs::read_to_string(path)?;
    parse_tests(&input)
}
