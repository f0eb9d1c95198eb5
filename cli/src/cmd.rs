use std::path::PathBuf;

use batchjudge_core::{action, discovery::ProgramSelection, serdable::GlobPattern};

use crate::{config, util};

/// Grades every submission directory against a list of tests and answers.
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Test file, one input per line
    #[arg(short = 't', long = "tests")]
    pub tests: Option<PathBuf>,

    /// Answer file, one expected output per line
    #[arg(short = 'a', long = "answers")]
    pub answers: Option<PathBuf>,

    /// Show which tests failed and why
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the pass rate of every test (also `-pr`)
    #[arg(long)]
    pub pass_rate: bool,

    /// Print tests that every submission failed (also `-af`)
    #[arg(long)]
    pub all_failed: bool,

    /// Directory containing one subdirectory per submission
    #[arg(short = 'C', long = "dir")]
    pub submissions_dir: Option<PathBuf>,

    /// Command used to run each program
    #[arg(short, long)]
    pub interpreter: Option<PathBuf>,

    /// File name pattern of a runnable program
    #[arg(short, long)]
    pub pattern: Option<GlobPattern>,

    /// Which program to run when several files match
    #[arg(long, value_enum)]
    pub select: Option<ArgSelection>,

    /// Number of submissions graded at once
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// Per-run time limit in milliseconds
    #[arg(long, value_name = "MS")]
    pub time_limit: Option<u64>,

    /// Abort the whole run when any program crashes or times out
    #[arg(long)]
    pub abort_on_failure: bool,

    /// Config file (default: ./batchjudge.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum ArgSelection {
    FirstListed,
    Lexicographic,
    Unique,
}

impl From<ArgSelection> for ProgramSelection {
    fn from(value: ArgSelection) -> Self {
        use ArgSelection::*;
        match value {
            FirstListed => ProgramSelection::FirstListed,
            Lexicographic => ProgramSelection::Lexicographic,
            Unique => ProgramSelection::Unique,
        }
    }
}

pub type CmdResult = anyhow::Result<()>;

impl Args {
    pub async fn exec(&self) -> CmdResult {
        if self.no_color {
            colored::control::set_override(false);
        }
        let cwd = util::current_dir()?;
        let cfg = config::resolve(self, &cwd)?;
        log::debug!("{:?}", cfg);

        let board = action::grade_all(&cwd, &cfg).await?;
        action::print_report(&board, &cfg)
    }
}
