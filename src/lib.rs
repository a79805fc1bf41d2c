//! Static checker for redirect rules.
//!
//! A [`RuleSet`] is loaded from an Apache-style rule file (`redirect` and
//! `redirectmatch` directives) and a list of [`TestCase`]s from a companion
//! file of expected outcomes. [`process_tests`] follows each test path through
//! the rules, hop by hop, and reports tests whose first hop answers
//! differently than declared, redirect cycles, chains longer than the
//! configured hop limit, and rules no test exercised.
//!
//! ```
//! use redirect_audit::{CheckConfig, RuleSet, TracingSink, parse, process_tests};
//!
//! let ruleset = RuleSet::from_rules("redirect 301 /old /new\nredirect 410 /gone\n").unwrap();
//! let tests = parse::parse_tests("/old 301 /new\n/gone 410\n").unwrap();
//!
//! let config = CheckConfig::new();
//! let report = process_tests(&ruleset, &tests, &config, &mut TracingSink);
//! assert_eq!(report.failure_count(&config), 0);
//! ```

mod error;
pub mod parse;
mod resolve;
mod types;

pub use error::Error;
pub use resolve::{DIRECT_STATUS, MAX_CHAIN_LEN, check_test, find_chain, process_tests};
pub use types::{
    CheckConfig, DEFAULT_STATUS, Diagnostic, DiagnosticSink, Finding, GONE_STATUS, MatchError,
    MatchRecord, Report, Rule, RuleError, RuleKind, RuleSet, TestCase, TestCaseError, TestOutcome,
    TracingSink,
};
