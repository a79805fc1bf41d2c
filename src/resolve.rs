use std::collections::HashSet;

use crate::{CheckConfig, DiagnosticSink, MatchRecord, Report, RuleSet, TestCase, TestOutcome};

/// Hard cap on chain length, independent of the configured hop limit.
pub const MAX_CHAIN_LEN: usize = 5;

/// Expected status of a path that should be served directly.
pub const DIRECT_STATUS: &str = "200";

/// Follow redirects from `path` through `ruleset`.
///
/// Stops when nothing matches, when a rule without a target fires, when a
/// rule fires a second time (the repeating record is kept), or once the
/// chain holds [`MAX_CHAIN_LEN`] records.
pub fn find_chain(
    ruleset: &RuleSet,
    path: &str,
    sink: &mut impl DiagnosticSink,
) -> Vec<MatchRecord> {
    let mut seen = HashSet::new();
    let mut chain = Vec::new();
    let mut path = path.to_owned();

    while chain.len() < MAX_CHAIN_LEN {
        let Some(record) = ruleset.find_match(&path, sink) else {
            break;
        };
        let repeated = !seen.insert(record.line_number());
        let next = record.target().map(str::to_owned);
        chain.push(record);
        if repeated {
            break;
        }
        match next {
            Some(next) => path = next,
            None => break,
        }
    }

    chain
}

/// Resolve one test case and classify the result.
///
/// Correctness is judged on the first hop only; a longer chain is then
/// checked for a cycle (first and last records equal) and against the hop
/// limit in `config`.
pub fn check_test(
    ruleset: &RuleSet,
    test: &TestCase,
    config: &CheckConfig,
    sink: &mut impl DiagnosticSink,
) -> TestOutcome {
    let chain = find_chain(ruleset, &test.input, sink);

    if chain.is_empty() {
        if test.expected_code.as_deref() == Some(DIRECT_STATUS) {
            return TestOutcome::Direct;
        }
        return TestOutcome::Mismatch(chain);
    }
    let first = &chain[0];
    let last = &chain[chain.len() - 1];

    if !first.has_outcome(
        test.expected_code.as_deref(),
        test.expected_target.as_deref(),
    ) {
        return TestOutcome::Mismatch(chain);
    }

    if chain.len() == 1 {
        return TestOutcome::Used(first.line_number());
    }

    if first == last {
        return TestOutcome::Cycle(chain);
    }

    if config.exceeds_hop_limit(chain.len()) {
        return TestOutcome::ExcessiveHops(chain);
    }

    TestOutcome::Used(first.line_number())
}

/// Run every test against `ruleset` and gather the findings.
pub fn process_tests(
    ruleset: &RuleSet,
    tests: &[TestCase],
    config: &CheckConfig,
    sink: &mut impl DiagnosticSink,
) -> Report {
    let outcomes: Vec<(TestCase, TestOutcome)> = tests
        .iter()
        .map(|test| (test.clone(), check_test(ruleset, test, config, sink)))
        .collect();
    Report::collect(ruleset, outcomes)
}
