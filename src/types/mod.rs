mod config;
mod diagnostic;
mod error;
mod match_record;
mod report;
mod rule;
mod ruleset;
mod test_case;

pub use config::CheckConfig;
pub use diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{MatchError, RuleError, TestCaseError};
pub use match_record::MatchRecord;
pub use report::{Finding, Report, TestOutcome};
pub use rule::{DEFAULT_STATUS, GONE_STATUS, Rule, RuleKind};
pub use ruleset::RuleSet;
pub use test_case::TestCase;
