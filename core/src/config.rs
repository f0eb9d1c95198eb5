use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

use crate::discovery::{ProgramFinder, ProgramSelection};
use crate::grading::{self, FailurePolicy};
use crate::report::ReportOptions;
use crate::serdable::GlobPattern;
use crate::testing::ProgramRunner;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub tests: PathBuf,
    pub answers: PathBuf,
    pub submissions_dir: PathBuf,
    pub interpreter: PathBuf,
    pub program_pattern: GlobPattern,
    pub program_selection: ProgramSelection,
    pub jobs: Option<usize>,
    pub time_limit_ms: Option<u64>,
    pub abort_on_failure: bool,
    pub report: ReportOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_config_file: None,
            tests: "tests.txt".into(),
            answers: "answers.txt".into(),
            submissions_dir: ".".into(),
            interpreter: ProgramRunner::DEFAULT_INTERPRETER.into(),
            program_pattern: Self::default_program_pattern(),
            program_selection: ProgramSelection::default(),
            jobs: None,
            time_limit_ms: None,
            abort_on_failure: false,
            report: ReportOptions::default(),
        }
    }
}

impl Config {
    pub const FILENAME: &str = "batchjudge.toml";

    fn default_program_pattern() -> GlobPattern {
        match GlobPattern::parse("*.py") {
            Ok(pat) => pat,
            Err(e) => unreachable!("default pattern is valid: {}", e),
        }
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let toml = fsutil::read_to_string(filepath).context("Cannot read config file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath.to_owned());
        Ok(cfg)
    }

    /// Reads `batchjudge.toml` in `dir` if present, otherwise the built-in defaults.
    pub fn from_dir_or_default(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = dir.as_ref().join(Self::FILENAME);
        if !path.is_file() {
            log::debug!("No {} in {:?}, using defaults", Self::FILENAME, dir.as_ref());
            return Ok(Self::default());
        }
        Self::from_toml_file(path)
    }

    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(grading::default_jobs)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.abort_on_failure {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Isolate
        }
    }

    pub fn program_finder(&self) -> ProgramFinder {
        ProgramFinder::new(self.program_pattern.clone(), self.program_selection)
    }

    pub fn program_runner(&self) -> ProgramRunner {
        ProgramRunner::new(&self.interpreter).time_limit(self.time_limit())
    }
}
