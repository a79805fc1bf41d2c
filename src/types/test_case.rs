use std::fmt;

use super::error::TestCaseError;

/// One expected outcome read from the test file:
/// `<path> <status> [<target>]`.
///
/// Missing trailing fields are absent, so `/gone 410` and `/page 200` are
/// valid lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub line_number: usize,
    pub input: String,
    pub expected_code: Option<String>,
    pub expected_target: Option<String>,
}

impl TestCase {
    pub fn new(
        line_number: usize,
        input: impl Into<String>,
        expected_code: Option<&str>,
        expected_target: Option<&str>,
    ) -> Self {
        Self {
            line_number,
            input: input.into(),
            expected_code: expected_code.map(str::to_owned),
            expected_target: expected_target.map(str::to_owned),
        }
    }

    /// Build a test case from a tokenized line, padding missing trailing
    /// fields with absent values.
    ///
    /// # Errors
    ///
    /// Returns [`TestCaseError::WrongFieldCount`] for an empty line or one
    /// with more than three fields.
    pub fn from_fields<S: AsRef<str>>(
        line_number: usize,
        fields: &[S],
    ) -> Result<Self, TestCaseError> {
        let fields: Vec<&str> = fields.iter().map(|f| f.as_ref()).collect();
        match *fields.as_slice() {
            [input] => Ok(Self::new(line_number, input, None, None)),
            [input, code] => Ok(Self::new(line_number, input, Some(code), None)),
            [input, code, target] => {
                Ok(Self::new(line_number, input, Some(code), Some(target)))
            }
            _ => Err(TestCaseError::WrongFieldCount {
                line: line_number,
                fields: fields.iter().map(|f| (*f).to_owned()).collect(),
            }),
        }
    }
}

impl fmt::Display for TestCase {
    /// The test's fields as they appeared in the file, space-joined.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.input)?;
        for field in [&self.expected_code, &self.expected_target].into_iter().flatten() {
            write!(f, " {field}")?;
        }
        Ok(())
    }
}
