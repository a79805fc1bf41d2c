use std::collections::BTreeSet;
use std::fmt;

use super::config::CheckConfig;
use super::match_record::MatchRecord;
use super::ruleset::RuleSet;
use super::test_case::TestCase;

/// How a single test case fared against the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// No rule matched and none was expected to (`200`).
    Direct,
    /// The first hop answered as expected; the rule on this line was exercised.
    Used(usize),
    /// No rule matched, or the first hop answered differently than expected.
    Mismatch(Vec<MatchRecord>),
    /// The chain came back around to its first record.
    Cycle(Vec<MatchRecord>),
    /// The chain is longer than the configured hop limit.
    ExcessiveHops(Vec<MatchRecord>),
}

/// A failed test together with the chain it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub test: TestCase,
    pub chain: Vec<MatchRecord>,
}

/// Everything found while checking a rule set against its tests.
///
/// The four finding collections are independent; a test lands in at most
/// one of them. Untested rules are kept sorted so rendering is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Report {
    mismatches: Vec<Finding>,
    cycles: Vec<Finding>,
    excessive_hops: Vec<Finding>,
    used: BTreeSet<usize>,
    untested: BTreeSet<usize>,
}

impl Report {
    /// Fold per-test outcomes into a report and work out which rules went
    /// unexercised.
    ///
    /// Outcomes may come from any number of independent evaluations; the
    /// used set is merged here.
    pub fn collect(
        ruleset: &RuleSet,
        outcomes: impl IntoIterator<Item = (TestCase, TestOutcome)>,
    ) -> Self {
        let mut report = Self::default();
        for (test, outcome) in outcomes {
            match outcome {
                TestOutcome::Direct => {}
                TestOutcome::Used(line) => {
                    report.used.insert(line);
                }
                TestOutcome::Mismatch(chain) => report.mismatches.push(Finding { test, chain }),
                TestOutcome::Cycle(chain) => report.cycles.push(Finding { test, chain }),
                TestOutcome::ExcessiveHops(chain) => {
                    report.excessive_hops.push(Finding { test, chain });
                }
            }
        }
        report.untested = ruleset
            .all_ids()
            .iter()
            .copied()
            .filter(|id| !report.used.contains(id))
            .collect();
        report
    }

    /// Tests whose first hop did not answer as expected, including tests
    /// no rule matched at all (empty chain).
    #[must_use]
    pub fn mismatches(&self) -> &[Finding] {
        &self.mismatches
    }

    #[must_use]
    pub fn cycles(&self) -> &[Finding] {
        &self.cycles
    }

    #[must_use]
    pub fn excessive_hops(&self) -> &[Finding] {
        &self.excessive_hops
    }

    /// Line numbers of rules that were the correct first match of some test.
    #[must_use]
    pub fn used(&self) -> &BTreeSet<usize> {
        &self.used
    }

    /// Line numbers of rules no test exercised, ascending.
    #[must_use]
    pub fn untested(&self) -> &BTreeSet<usize> {
        &self.untested
    }

    /// Number of failures under `config`. Untested rules only count when
    /// `error_untested` is set.
    #[must_use]
    pub fn failure_count(&self, config: &CheckConfig) -> usize {
        let untested = if config.error_untested {
            self.untested.len()
        } else {
            0
        };
        self.mismatches.len() + self.cycles.len() + self.excessive_hops.len() + untested
    }

    /// Render the report as human-readable text.
    #[must_use]
    pub fn render(&self, ruleset: &RuleSet, config: &CheckConfig) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, ruleset, config);
        out
    }

    fn write_to(
        &self,
        out: &mut impl fmt::Write,
        ruleset: &RuleSet,
        config: &CheckConfig,
    ) -> fmt::Result {
        for finding in &self.mismatches {
            let test = &finding.test;
            if finding.chain.is_empty() {
                writeln!(out, "No rule matched test on line {}: {test}", test.line_number)?;
            } else {
                writeln!(
                    out,
                    "Unexpected result for test on line {}: {test}",
                    test.line_number
                )?;
                write_trace(out, finding)?;
            }
        }

        for finding in &self.cycles {
            let test = &finding.test;
            writeln!(out, "Cycle found from test on line {}: {test}", test.line_number)?;
            write_trace(out, finding)?;
        }

        for finding in &self.excessive_hops {
            let test = &finding.test;
            writeln!(
                out,
                "Excessive redirects found from test on line {}: {test}",
                test.line_number
            )?;
            write_trace(out, finding)?;
        }

        if !self.untested.is_empty() && !config.quiet {
            writeln!(out)?;
            for &line in &self.untested {
                match ruleset.get(line) {
                    Some(rule) => writeln!(out, "Untested rule: {rule}")?,
                    None => writeln!(out, "Untested rule: [{line}]")?,
                }
            }
        }

        let failures = self.failure_count(config);
        if failures > 0 {
            writeln!(out, "\n{failures} failures")?;
        }
        Ok(())
    }
}

/// One line per hop: the rule that fired, where it went from and to, and
/// the status it answered with.
fn write_trace(out: &mut impl fmt::Write, finding: &Finding) -> fmt::Result {
    let mut from = finding.test.input.as_str();
    for record in &finding.chain {
        let to = record.target().unwrap_or("-");
        writeln!(
            out,
            "  [rule {}] {from} -> {to} ({})",
            record.line_number(),
            record.status_code()
        )?;
        from = to;
    }
    Ok(())
}
