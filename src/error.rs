use thiserror::Error;

use crate::parse::ParseError;
use crate::{RuleError, TestCaseError};

/// Unified error type covering loading of rule and test files.
///
/// Returned by convenience methods like [`RuleSet::from_rules()`](crate::RuleSet::from_rules)
/// and [`parse_tests()`](crate::parse::parse_tests). Any of these aborts a run
/// before a single test is evaluated.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    TestCase(#[from] TestCaseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
