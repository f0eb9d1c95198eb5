use std::time::Duration;

/// Result of one (submission, test) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Verdict {
    #[strum(serialize = "OK")]
    Pass,
    #[strum(serialize = "WA")]
    Wrong,
    #[strum(serialize = "RE")]
    Crash,
    #[strum(serialize = "TLE")]
    Timeout,
    /// The submission has no program to run.
    #[strum(serialize = "NP")]
    NoProgram,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramOutput {
    pub stdout: String,
    pub stderr: String,
    pub execution_time: Duration,
}

impl ProgramOutput {
    /// Standard output with exactly one trailing `\n` removed.
    pub fn normalized(&self) -> &str {
        normalize_output(&self.stdout)
    }
}

/// Strips a single trailing `\n`, nothing else.
/// ```
/// use batchjudge_core::testing::normalize_output;
///
/// assert_eq!(normalize_output("4\n"), "4");
/// assert_eq!(normalize_output("4\n\n"), "4\n");
/// assert_eq!(normalize_output("4\r\n"), "4\r");
/// assert_eq!(normalize_output(" 4 "), " 4 ");
/// ```
pub fn normalize_output(stdout: &str) -> &str {
    stdout.strip_suffix('\n').unwrap_or(stdout)
}
