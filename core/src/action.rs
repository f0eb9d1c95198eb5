use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::config::Config;
use crate::discovery;
use crate::fixture::FixtureSet;
use crate::grading::Grader;
use crate::report;
use crate::scoring::Scoreboard;

/// Loads the fixtures, discovers submissions under `cfg.submissions_dir` and grades all of them.
///
/// Relative paths in `cfg` are resolved against `base_dir`.
pub async fn grade_all(base_dir: impl AsRef<Path>, cfg: &Config) -> Result<Scoreboard> {
    let base_dir = base_dir.as_ref();
    let tests = resolve(base_dir, &cfg.tests);
    let answers = resolve(base_dir, &cfg.answers);
    let fixtures = FixtureSet::load(tests, answers).context("Cannot load tests and answers")?;

    let root = resolve(base_dir, &cfg.submissions_dir);
    let submissions = discovery::discover(&root, &cfg.program_finder())
        .context("Cannot discover submissions")?;

    let grader = Grader::new(cfg.program_runner(), fixtures)
        .jobs(cfg.jobs())
        .failure_policy(cfg.failure_policy())
        .progress(self::progress_bar());

    let board = grader.grade(&submissions).await?;
    Ok(board)
}

/// Joins `path` onto `base_dir`, dropping `.` components so that diagnostics show clean paths.
fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    base_dir.join(path).components().collect()
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    match ProgressStyle::with_template("{spinner} grading [{bar:30}] {pos}/{len}") {
        Ok(style) => bar.with_style(style.progress_chars("=> ")),
        Err(e) => {
            log::debug!("Invalid progress template: {}", e);
            bar
        }
    }
}

pub fn print_report(board: &Scoreboard, cfg: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut w = stdout.lock();
    report::write_report(&mut w, board, &cfg.report).context("Cannot write report")?;
    w.flush().context("Cannot write report")
}
