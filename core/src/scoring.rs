use std::collections::BTreeMap;

use crate::discovery::Submission;
use crate::fixture::Fixture;
use crate::testing::Verdict;

/// Exact string comparison of normalized output against the expected answer.
pub fn judge(actual: &str, expected: &str) -> Verdict {
    if actual == expected {
        Verdict::Pass
    } else {
        Verdict::Wrong
    }
}

/// `floor(part * 100 / whole)`, or 0 when `whole` is 0.
/// ```
/// use batchjudge_core::scoring::percentage;
///
/// assert_eq!(percentage(1, 3), 33);
/// assert_eq!(percentage(2, 3), 66);
/// assert_eq!(percentage(3, 3), 100);
/// assert_eq!(percentage(0, 0), 0);
/// ```
pub fn percentage(part: usize, whole: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    part * 100 / whole
}

/// A failed test worth showing in verbose output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub submission: String,
    pub test_no: usize,
    pub verdict: Verdict,
    pub expected: String,
    pub actual: Option<String>,
    pub stderr: Option<String>,
}

/// Per-submission accumulator, owned by exactly one grading unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTally {
    pub id: String,
    pub passed: usize,
    pub verdicts: Vec<Verdict>,
    pub failures: Vec<FailureRecord>,
}

impl SubmissionTally {
    pub fn new(id: impl Into<String>, num_tests: usize) -> Self {
        Self {
            id: id.into(),
            passed: 0,
            verdicts: Vec::with_capacity(num_tests),
            failures: Vec::new(),
        }
    }

    /// Every test fails without running anything.
    pub fn without_program(id: impl Into<String>, num_tests: usize) -> Self {
        Self {
            id: id.into(),
            passed: 0,
            verdicts: vec![Verdict::NoProgram; num_tests],
            failures: Vec::new(),
        }
    }

    /// Scores the normalized output of one test. Tests must be recorded in fixture order.
    pub fn record_output(&mut self, fixture: &Fixture, actual: &str) -> Verdict {
        debug_assert_eq!(self.verdicts.len() + 1, fixture.no);
        let verdict = judge(actual, &fixture.expected);
        if verdict.is_pass() {
            self.passed += 1;
        } else {
            self.failures.push(FailureRecord {
                submission: self.id.clone(),
                test_no: fixture.no,
                verdict,
                expected: fixture.expected.clone(),
                actual: Some(actual.to_owned()),
                stderr: None,
            });
        }
        self.verdicts.push(verdict);
        verdict
    }

    /// Scores a test whose program crashed or timed out.
    pub fn record_failure(&mut self, fixture: &Fixture, verdict: Verdict, stderr: Option<&str>) {
        debug_assert_eq!(self.verdicts.len() + 1, fixture.no);
        debug_assert!(!verdict.is_pass());
        self.failures.push(FailureRecord {
            submission: self.id.clone(),
            test_no: fixture.no,
            verdict,
            expected: fixture.expected.clone(),
            actual: None,
            stderr: stderr.map(str::to_owned),
        });
        self.verdicts.push(verdict);
    }
}

/// Final per-submission and per-test counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    num_tests: usize,
    scores: BTreeMap<String, usize>,
    pass_counts: Vec<usize>,
    failures: BTreeMap<String, Vec<FailureRecord>>,
}

impl Scoreboard {
    /// Creates a zero entry for every submission.
    pub fn new<'a>(submissions: impl IntoIterator<Item = &'a Submission>, num_tests: usize) -> Self {
        Self {
            num_tests,
            scores: submissions
                .into_iter()
                .map(|s| (s.id.clone(), 0))
                .collect(),
            pass_counts: vec![0; num_tests],
            failures: BTreeMap::new(),
        }
    }

    pub fn merge(&mut self, tally: SubmissionTally) {
        debug_assert!(tally.verdicts.len() <= self.num_tests);
        for (count, verdict) in self.pass_counts.iter_mut().zip(&tally.verdicts) {
            if verdict.is_pass() {
                *count += 1;
            }
        }
        *self.scores.entry(tally.id.clone()).or_default() += tally.passed;
        if !tally.failures.is_empty() {
            self.failures
                .entry(tally.id)
                .or_default()
                .extend(tally.failures);
        }
    }

    pub fn num_tests(&self) -> usize {
        self.num_tests
    }

    pub fn num_submissions(&self) -> usize {
        self.scores.len()
    }

    pub fn score(&self, id: &str) -> Option<usize> {
        self.scores.get(id).copied()
    }

    /// `(id, passed)` sorted by id.
    pub fn scores(&self) -> impl Iterator<Item = (&str, usize)> {
        self.scores.iter().map(|(id, &n)| (id.as_str(), n))
    }

    pub fn percentage_of(&self, id: &str) -> Option<usize> {
        self.score(id).map(|n| percentage(n, self.num_tests))
    }

    /// Number of submissions that passed each test, indexed from test 1.
    pub fn pass_counts(&self) -> &[usize] {
        &self.pass_counts
    }

    /// `(test_no, pass percentage over all submissions)`.
    pub fn pass_rates(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.num_submissions();
        self.pass_counts
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i + 1, percentage(c, n)))
    }

    /// Tests no submission passed, in increasing order.
    pub fn all_failed_tests(&self) -> impl Iterator<Item = usize> + '_ {
        self.pass_counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 0)
            .map(|(i, _)| i + 1)
    }

    /// Failure records grouped by submission id, tests in fixture order.
    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.failures.values().flatten()
    }
}
